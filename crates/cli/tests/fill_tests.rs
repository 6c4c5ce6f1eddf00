// Integration tests for `dempl fill` and `dempl accounts`.
// Run with: cargo test -p dempl-cli --test fill_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::Command;

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn dempl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dempl"));
    // Keep a developer's own settings file out of the tests
    cmd.env("DEMPL_CONFIG", Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/settings.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

const G: u16 = 6;
const K: u16 = 10;
const V: u16 = 21;

fn write_trial_balance(dir: &Path) -> PathBuf {
    let path = dir.join("balancete.xlsx");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, G, "CNPJ").unwrap();
    ws.write_string(0, K, "Saldo Atual").unwrap();
    ws.write_string(0, V, "Conta").unwrap();

    let rows: [(&str, f64); 4] = [
        ("12345 - Ações BOVESPA", 1_500_000.0),
        ("200", 2_500.0),
        ("300 Títulos públicos", 10_000.0),
        ("61180 Taxa de administração", -1_234_000.0),
    ];
    for (i, (account, balance)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write_string(row, V, *account).unwrap();
        ws.write_number(row, K, *balance).unwrap();
    }
    ws.write_string(1, G, "43.096.339/0001-46").unwrap();
    wb.save(&path).unwrap();
    path
}

fn write_template(dir: &Path) -> PathBuf {
    let path = dir.join("Dem_PL_Modelo.xlsx");
    let mut book = umya_spreadsheet::new_file();
    let ws = book.get_sheet_collection_mut().get_mut(0).unwrap();
    ws.get_cell_mut("B2").set_value_string("Demonstração das Mutações do Patrimônio Líquido");
    ws.get_cell_mut("J5").set_value_string("12345 + 999");
    ws.get_cell_mut("A30").set_value_string("Ações e Opções");
    ws.get_cell_mut("J31").set_value_string("200");
    ws.get_cell_mut("J34").set_formula("SUM(J31:J33)");
    ws.get_cell_mut("A36").set_value_string("Renda fixa e outros valores mobiliários");
    ws.get_cell_mut("J37").set_value_number(300);
    ws.get_cell_mut("J58").set_formula("J34+J40+J45+J55");
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    path
}

fn write_position(dir: &Path) -> PathBuf {
    let path = dir.join("carteira.csv");
    std::fs::write(
        &path,
        "01/03/2024;100,000;1,000000\n04/03/2024;123519889,535;1,2345678\nData;NCotas;VlCotas\nTotal;;\n",
    )
    .unwrap();
    path
}

fn write_movement(dir: &Path) -> PathBuf {
    let path = dir.join("movimentacao.csv");
    std::fs::write(&path, "Fundo;2.345.678,9;1.000,5\nCotista;NCATOT_Tot;NCRTOT_Tot\n").unwrap();
    path
}

fn text_at(ws: &umya_spreadsheet::Worksheet, a1: &str) -> String {
    ws.get_cell(a1).map(|c| c.get_value().to_string()).unwrap_or_default()
}

fn number_at(ws: &umya_spreadsheet::Worksheet, a1: &str) -> Option<f64> {
    ws.get_cell(a1).and_then(|c| c.get_value_number())
}

#[test]
fn fill_writes_resolved_template_and_report() {
    let dir = TempDir::new().unwrap();
    let tb = write_trial_balance(dir.path());
    let template = write_template(dir.path());
    let position = write_position(dir.path());
    let movement = write_movement(dir.path());
    let out = dir.path().join("saida.xlsx");
    let report = dir.path().join("saida.json");

    let output = dempl()
        .args(["fill", "--trial-balance"])
        .arg(&tb)
        .arg("--template")
        .arg(&template)
        .arg("--position")
        .arg(&position)
        .arg("--movement")
        .arg(&movement)
        .arg("-o")
        .arg(&out)
        .arg("--report")
        .arg(&report)
        .output()
        .expect("dempl fill");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("written: {}", out.display())), "stdout: {stdout}");
    assert!(stdout.contains("cnpj:    43.096.339/0001-46"), "stdout: {stdout}");
    assert!(stdout.contains("grand total 13"), "stdout: {stdout}");

    let book = umya_spreadsheet::reader::xlsx::read(&out).unwrap();
    let ws = book.get_sheet_collection_no_check().first().unwrap();

    assert_eq!(number_at(ws, "J5"), Some(1500.0));
    assert_eq!(number_at(ws, "J31"), Some(3.0));
    assert_eq!(number_at(ws, "J37"), Some(10.0));
    assert_eq!(number_at(ws, "J34"), Some(3.0));
    assert_eq!(number_at(ws, "J40"), Some(10.0));
    assert_eq!(number_at(ws, "J58"), Some(13.0));
    assert!(!ws.get_cell("J58").unwrap().is_formula());

    assert_eq!(text_at(ws, "J23"), "(1.234)");
    assert_eq!(text_at(ws, "L8"), "CNPJ: 43.096.339/0001-46");
    assert_eq!(text_at(ws, "D18"), "123.519.889,535");
    assert_eq!(text_at(ws, "D20"), "2.345.678,900");
    assert_eq!(text_at(ws, "D22"), "1.000,500");
    assert_eq!(text_at(ws, "B2"), "Demonstração das Mutações do Patrimônio Líquido");

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["grand_total"], 13);
    assert_eq!(json["cnpj"], "43.096.339/0001-46");
    assert_eq!(json["missing"]["999"], 1);
    assert_eq!(json["sections"]["equities"], 3);
    assert_eq!(json["sections"]["fixed_income"], 10);
    assert_eq!(json["changes"].as_array().unwrap().len(), 3);
}

#[test]
fn missing_trial_balance_exits_3_without_output() {
    let dir = TempDir::new().unwrap();
    let template = write_template(dir.path());
    let out = dir.path().join("saida.xlsx");

    let output = dempl()
        .args(["fill", "--trial-balance"])
        .arg(dir.path().join("nope.xlsx"))
        .arg("--template")
        .arg(&template)
        .arg("-o")
        .arg(&out)
        .output()
        .expect("dempl fill");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: trial balance not found"), "stderr: {stderr}");
    assert!(!out.exists());
}

#[test]
fn missing_optional_sources_only_warn() {
    let dir = TempDir::new().unwrap();
    let tb = write_trial_balance(dir.path());
    let template = write_template(dir.path());
    let out = dir.path().join("saida.xlsx");

    let output = dempl()
        .args(["fill", "--trial-balance"])
        .arg(&tb)
        .arg("--template")
        .arg(&template)
        .arg("--movement")
        .arg(dir.path().join("sem_movimentacao.csv"))
        .arg("-o")
        .arg(&out)
        .output()
        .expect("dempl fill");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("quotaholder movement"));

    let book = umya_spreadsheet::reader::xlsx::read(&out).unwrap();
    let ws = book.get_sheet_collection_no_check().first().unwrap();
    assert_eq!(text_at(ws, "D20"), "");
}

#[test]
fn output_may_not_overwrite_template() {
    let dir = TempDir::new().unwrap();
    let tb = write_trial_balance(dir.path());
    let template = write_template(dir.path());

    let output = dempl()
        .args(["fill", "--trial-balance"])
        .arg(&tb)
        .arg("--template")
        .arg(&template)
        .arg("-o")
        .arg(&template)
        .output()
        .expect("dempl fill");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_settings_file_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let tb = write_trial_balance(dir.path());
    let template = write_template(dir.path());
    let settings = dir.path().join("settings.toml");
    std::fs::write(&settings, "[layout]\ngrand_total_cell = \"not a cell\"\n").unwrap();

    let output = dempl()
        .args(["fill", "--trial-balance"])
        .arg(&tb)
        .arg("--template")
        .arg(&template)
        .arg("--config")
        .arg(&settings)
        .output()
        .expect("dempl fill");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("hint:"));
}

#[test]
fn accounts_lists_index() {
    let dir = TempDir::new().unwrap();
    let tb = write_trial_balance(dir.path());

    let output = dempl().args(["accounts", "-t"]).arg(&tb).output().expect("dempl accounts");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["12345;1500000", "200;2500", "300;10000", "61180;-1234000"]);

    let output = dempl().args(["accounts", "--json", "-t"]).arg(&tb).output().expect("dempl accounts --json");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["61180"], "-1234000");
}
