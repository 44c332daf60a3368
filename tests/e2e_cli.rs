use assert_cmd::{cargo, prelude::*};
use predicates::prelude::*;
use std::{fs, process::Command};
use tempfile::TempDir;

const FIXTURE: &str = "tests/data/venda_x_cliente.txt";

fn setup_temp_config_home() -> TempDir {
    TempDir::new().expect("failed to create temp config home")
}

fn vendas(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("vendas"));
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn extract_prints_table_without_ansi_when_piped() {
    let home = setup_temp_config_home();

    vendas(&home)
        .arg("extract")
        .arg(FIXTURE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 records"))
        .stdout(predicate::str::contains("Acme Corp"))
        .stdout(predicate::str::contains("Comercial Gama Sul Ltda"))
        .stdout(predicate::str::contains("3.500,00").not())
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn extract_limit_truncates_table() {
    let home = setup_temp_config_home();

    vendas(&home)
        .args(["extract", FIXTURE, "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Corp"))
        .stdout(predicate::str::contains("Beta Ltd").not())
        .stdout(predicate::str::contains("... and 3 more records"));
}

#[test]
fn extract_json_uses_column_keys() {
    let home = setup_temp_config_home();

    let output = vendas(&home)
        .args(["--json", "extract", FIXTURE])
        .output()
        .expect("failed to run vendas");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let documents = json.as_array().expect("one entry per document");
    assert_eq!(documents.len(), 1);
    let json = &documents[0];
    assert_eq!(json["file"], FIXTURE);
    let records = json["records"].as_array().expect("records array");
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["cliente"], "Acme Corp");
    assert_eq!(records[0]["primeira_venda"], "2024-01-01");
    assert_eq!(records[0]["total_devolucao"], "150.00");
    assert_eq!(records[0]["qtd"], 5200);
    assert_eq!(records[0]["lucro_percentual"], "15.5");
    assert_eq!(records[1]["total_devolucao"], serde_json::Value::Null);
    assert_eq!(json["header_line"], 2);
    assert_eq!(json["stats"]["fragments_discarded"], 1);
}

#[test]
fn extract_reports_nothing_found() {
    let home = setup_temp_config_home();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vazio.txt");
    fs::write(&path, "Página 1 de 1\n").unwrap();

    vendas(&home)
        .arg("extract")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhum dado encontrado"));
}

#[test]
fn extract_missing_file_fails() {
    let home = setup_temp_config_home();

    vendas(&home)
        .args(["extract", "tests/data/does_not_exist.txt"])
        .assert()
        .failure();
}

#[test]
fn extract_processes_several_documents() {
    let home = setup_temp_config_home();
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("vazio.txt");
    fs::write(&empty, "Página 1 de 1\n").unwrap();

    vendas(&home)
        .args(["extract", FIXTURE])
        .arg(&empty)
        .assert()
        .success()
        .stdout(predicate::str::contains(FIXTURE))
        .stdout(predicate::str::contains("Found 4 records"))
        .stdout(predicate::str::contains("Nenhum dado encontrado"));
}

#[test]
fn extract_batch_continues_past_unreadable_documents() {
    let home = setup_temp_config_home();

    let output = vendas(&home)
        .args(["--json", "extract", "tests/data/does_not_exist.txt", FIXTURE])
        .output()
        .expect("failed to run vendas");
    assert!(!output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let documents = json.as_array().expect("one entry per document");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["records"].as_array().map(Vec::len), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does_not_exist.txt"));
}

#[test]
fn config_file_thresholds_are_applied() {
    let home = setup_temp_config_home();
    let config = home.path().join("strict.toml");
    fs::write(&config, "min_numbers = 20\n").unwrap();

    vendas(&home)
        .arg("--config")
        .arg(&config)
        .args(["extract", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhum dado encontrado"));
}

#[test]
fn invalid_config_file_is_an_error() {
    let home = setup_temp_config_home();
    let config = home.path().join("bad.toml");
    fs::write(&config, "min_datez = 2\n").unwrap();

    vendas(&home)
        .arg("--config")
        .arg(&config)
        .args(["extract", FIXTURE])
        .assert()
        .failure();
}

#[test]
fn clean_writes_output_file() {
    let home = setup_temp_config_home();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("limpo.txt");

    vendas(&home)
        .args(["clean", FIXTURE, "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    let cleaned = fs::read_to_string(&out).unwrap();
    assert!(!cleaned.contains("Página"));
    assert!(!cleaned.contains("TOTAIS"));
    assert!(cleaned.contains("Acme Corp"));
}

#[test]
fn clean_to_stdout_keeps_data_rows() {
    let home = setup_temp_config_home();

    vendas(&home)
        .args(["clean", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("Delta Peças ME"))
        .stdout(predicate::str::contains("Venda X Cliente").not());
}

#[test]
fn inspect_shows_line_decisions() {
    let home = setup_temp_config_home();

    vendas(&home)
        .args(["inspect", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("Header on line 3"))
        .stdout(predicate::str::contains("residue"))
        .stdout(predicate::str::contains("buffered"))
        .stdout(predicate::str::contains("fragment"))
        .stdout(predicate::str::contains("Omega Ltda 01/01/2024"));
}
