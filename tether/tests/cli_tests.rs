use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A working directory holding a DuckDB dependency table and a `tether.yaml`.
struct TetherTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl TetherTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();

        Self::seed_warehouse(&root.join("warehouse.duckdb"))?;
        std::fs::write(
            root.join("tether.yaml"),
            "warehouse:\n  database: warehouse.duckdb\n  origin_host: acme.snowflakecomputing.com\n",
        )?;

        Ok(Self { _tmp: tmp, root })
    }

    fn seed_warehouse(path: &Path) -> Result<()> {
        let conn = duckdb::Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE lineage_object_dependencies (
                REFERENCED_DATABASE VARCHAR, REFERENCED_SCHEMA VARCHAR,
                REFERENCED_OBJECT_NAME VARCHAR, REFERENCED_OBJECT_DOMAIN VARCHAR,
                REFERENCING_DATABASE VARCHAR, REFERENCING_SCHEMA VARCHAR,
                REFERENCING_OBJECT_NAME VARCHAR, REFERENCING_OBJECT_DOMAIN VARCHAR,
                DEPENDENCY_TYPE VARCHAR, STAGE_URL VARCHAR
             );
             INSERT INTO lineage_object_dependencies VALUES
                ('DB1', 'SCH1', 'T1', 'TABLE', 'DB1', 'SCH1', 'V1', 'VIEW', 'BY_NAME', NULL),
                ('DB1', 'SCH1', 'RAW', 'STAGE', 'DB1', 'SCH1', 'T1', 'TABLE', 'BY_ID', 's3://bucket/raw/');",
        )?;
        Ok(())
    }

    fn tether(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tether"));
        cmd.current_dir(&self.root);
        for var in [
            "TETHER_WAREHOUSE_DATABASE",
            "TETHER_WAREHOUSE_QUERY",
            "TETHER_WAREHOUSE_ORIGIN_HOST",
            "TETHER_CATALOG_ACCOUNT",
            "TETHER_CATALOG_ENDPOINT",
            "TETHER_CATALOG_TENANT_ID",
            "TETHER_CATALOG_CLIENT_ID",
            "TETHER_CATALOG_CLIENT_SECRET",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }
}

#[test]
fn test_plan_prints_payloads_to_stdout() -> Result<()> {
    let env = TetherTestEnv::new()?;

    env.tether()
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("catalog_stage_load_process"))
        .stdout(predicate::str::contains(
            "catalog://acme.snowflakecomputing.com/databases/DB1/schemas/SCH1/stages/@RAW",
        ))
        .stdout(predicate::str::contains("from db1.sch1.t1 to db1.sch1.v1"));
    Ok(())
}

#[test]
fn test_plan_writes_output_file() -> Result<()> {
    let env = TetherTestEnv::new()?;
    let output = env.root.join("out/plan.json");

    env.tether()
        .args(["plan", "--output"])
        .arg(&output)
        .assert()
        .success();

    let plan: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(plan["origin_host"], "acme.snowflakecomputing.com");
    assert_eq!(plan["edges"].as_array().map(Vec::len), Some(2));
    assert_eq!(plan["edges"][0]["process"]["typeName"], "Process");
    Ok(())
}

#[test]
fn test_env_overrides_the_file() -> Result<()> {
    let env = TetherTestEnv::new()?;

    env.tether()
        .arg("plan")
        .env("TETHER_WAREHOUSE_ORIGIN_HOST", "other.host")
        .assert()
        .success()
        .stdout(predicate::str::contains("catalog://other.host/"));
    Ok(())
}

#[test]
fn test_missing_config_file_fails() -> Result<()> {
    let env = TetherTestEnv::new()?;

    env.tether()
        .args(["sync", "--config", "does-not-exist.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
    Ok(())
}

#[test]
fn test_sync_requires_catalog_settings() -> Result<()> {
    let env = TetherTestEnv::new()?;

    env.tether()
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid [catalog] configuration"));
    Ok(())
}

#[test]
fn test_missing_column_is_reported() -> Result<()> {
    let env = TetherTestEnv::new()?;

    env.tether()
        .arg("plan")
        .env(
            "TETHER_WAREHOUSE_QUERY",
            "SELECT referenced_database FROM lineage_object_dependencies",
        )
        .assert()
        .failure()
        .stderr(predicate::str::contains("referencing_object_name"));
    Ok(())
}
