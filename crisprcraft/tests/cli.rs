use assert_cmd::Command;
use predicates::prelude::*;

const BINARY: &str = "crisprcraft";
const POLY_A: &str = "AAAAAAAAAAAAAAAAAAAAAGG";

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn empty_sequence_is_a_user_error() -> TestResult {
    let out = tempfile::tempdir()?;
    Command::cargo_bin(BINARY)?
        .args(["design", "--sequence", "", "--output-dir"])
        .arg(out.path().join("results"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("sequence is empty"));

    assert!(!out.path().join("results").exists());
    Ok(())
}

#[test]
fn missing_input_is_a_user_error() -> TestResult {
    Command::cargo_bin(BINARY)?
        .args(["design", "--pam", "nag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no DNA sequence supplied"));
    Ok(())
}

#[test]
fn bare_design_reports_missing_input() -> TestResult {
    Command::cargo_bin(BINARY)?
        .arg("design")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no DNA sequence supplied"));
    Ok(())
}

#[test]
fn relative_output_dir_is_anchored_at_project_root() -> TestResult {
    let root = tempfile::tempdir()?;
    let elsewhere = tempfile::tempdir()?;
    let config = root.path().join("crisprcraft.json");
    std::fs::write(&config, r#"{ "output_dir": "rel_out" }"#)?;

    Command::cargo_bin(BINARY)?
        .current_dir(elsewhere.path())
        .env("PROJECT_ROOT", root.path())
        .args(["design", "--sequence", POLY_A, "--no-plots", "--config", "crisprcraft.json"])
        .assert()
        .success();

    let results = root.path().join("rel_out");
    assert!(results.join("grna_candidates.csv").is_file());
    assert!(results.join("off_target.csv").is_file());
    assert!(results.join("grna_summary.pdf").is_file());
    assert!(!elsewhere.path().join("rel_out").exists());
    Ok(())
}

#[test]
fn no_pam_hits_warns_and_exports_nothing() -> TestResult {
    let out = tempfile::tempdir()?;
    let results = out.path().join("results");
    Command::cargo_bin(BINARY)?
        .args(["design", "--sequence", "ACACACACACACACACACACACAC", "--output-dir"])
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::contains("No gRNAs found"));

    assert!(!results.exists());
    Ok(())
}

#[test]
fn poly_a_design_run() -> TestResult {
    let out = tempfile::tempdir()?;
    Command::cargo_bin(BINARY)?
        .args(["design", "--sequence", POLY_A, "--seed", "11", "--no-plots", "--output-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Candidate gRNAs   : 1"))
        .stdout(predicate::str::contains("random placeholder values"));

    let table = std::fs::read_to_string(out.path().join("grna_candidates.csv"))?;
    let mut lines = table.lines();
    assert_eq!(
        lines.next(),
        Some("sequence,pam,location,gc_content,mismatches,score,efficiency")
    );
    let row = lines.next().ok_or("missing candidate row")?;
    assert!(row.starts_with("AAAAAAAAAAAAAAAAAAAA,AGG,pasted_sequence:1-20,0.0,0,100.0,"));
    assert!(lines.next().is_none());

    let off_target = std::fs::read_to_string(out.path().join("off_target.csv"))?;
    assert!(off_target.contains(",Low,"));
    assert!(out.path().join("grna_summary.pdf").exists());
    Ok(())
}

#[test]
fn fasta_file_input() -> TestResult {
    let dir = tempfile::tempdir()?;
    let fasta = dir.path().join("target.fa");
    std::fs::write(&fasta, format!(">chr1_fragment\n{}\n{}\n", &POLY_A[..12], &POLY_A[12..]))?;

    Command::cargo_bin(BINARY)?
        .args(["design", "--no-plots", "--no-pdf", "--input"])
        .arg(&fasta)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .success();

    let table = std::fs::read_to_string(dir.path().join("out/grna_candidates.csv"))?;
    assert!(table.contains("chr1_fragment:1-20"));
    assert!(!dir.path().join("out/grna_summary.pdf").exists());
    Ok(())
}

#[test]
fn invalid_custom_pam_is_rejected() -> TestResult {
    Command::cargo_bin(BINARY)?
        .args(["design", "-s", POLY_A, "--pam", "other", "--custom-pam", "N*G"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid PAM pattern"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn external_model_values_are_used() -> TestResult {
    let dir = tempfile::tempdir()?;
    let script = dir.path().join("predict.sh");
    std::fs::write(
        &script,
        "rows=$(($(wc -l < \"$2\") - 1))\n\
         echo efficiency > \"$4\"\n\
         i=0\n\
         while [ $i -lt $rows ]; do echo 42.5 >> \"$4\"; i=$((i+1)); done\n",
    )?;
    let config = dir.path().join("crisprcraft.json");
    std::fs::write(
        &config,
        serde_json::json!({
            "efficiency_model": {
                "python": "/bin/sh",
                "script": script,
                "work_dir": dir.path().join("model_io"),
            }
        })
        .to_string(),
    )?;

    Command::cargo_bin(BINARY)?
        .args(["design", "--sequence", POLY_A, "--no-plots", "--no-pdf", "--config"])
        .arg(&config)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("external efficiency model"));

    let table = std::fs::read_to_string(dir.path().join("out/grna_candidates.csv"))?;
    assert!(table.lines().nth(1).ok_or("missing row")?.ends_with(",42.5"));
    Ok(())
}

#[test]
fn pam_presets_are_listed() -> TestResult {
    Command::cargo_bin(BINARY)?
        .arg("pams")
        .assert()
        .success()
        .stdout(predicate::str::contains("NGG"))
        .stdout(predicate::str::contains("NAG"))
        .stdout(predicate::str::contains("NTG"));
    Ok(())
}
