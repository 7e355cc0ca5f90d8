//! Schema migrations for the Quill database.

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240601_000001_create_tables::Migration)]
    }
}

/// CLI subcommands that drop tables or data.
const DESTRUCTIVE_COMMANDS: &[&str] = &["down", "fresh", "refresh", "reset"];

/// Whether a migration CLI invocation would destroy data.
pub fn is_destructive<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .any(|arg| DESTRUCTIVE_COMMANDS.contains(&arg.as_ref()))
}

/// Whether the process runs in production, per `APP_ENV` or `NODE_ENV`.
pub fn is_production() -> bool {
    std::env::var("APP_ENV")
        .or_else(|_| std::env::var("NODE_ENV"))
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destructive_commands() {
        assert!(is_destructive(["migration", "fresh"]));
        assert!(is_destructive(["migration", "-u", "postgres://db", "reset"]));
        assert!(!is_destructive(["migration", "up"]));
        assert!(!is_destructive(["migration", "status"]));
    }
}
