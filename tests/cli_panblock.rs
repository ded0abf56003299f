use assert_cmd::prelude::*;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn command_info() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd.arg("info").arg("tests/block/acgt.json").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.contains("7\t8\t10\t2"));

    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("info")
        .arg("tests/block/acgt.json")
        .arg("--members")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains("7\tnode\t1\t10"));
    assert!(stdout.contains("7\tnode\t2\t6"));

    Ok(())
}

#[test]
fn command_consensus() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd.arg("consensus").arg("tests/block/acgt.json").output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, ">7\nACGTACGT\n");

    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("consensus")
        .arg("tests/block/acgt.json")
        .arg("--gapped")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, ">7\nACGT--ACGT\n");

    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("consensus")
        .arg("tests/block/acgt.json")
        .arg("--node")
        .arg("1")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, ">7:1\nACTTGGACGT\n");

    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("consensus")
        .arg("tests/block/acgt.json")
        .arg("--node")
        .arg("2")
        .arg("--gapped")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, ">7:2\nACGT----GT\n");

    Ok(())
}

#[test]
fn command_slice() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("slice")
        .arg("tests/block/acgt.json")
        .arg("--interval")
        .arg("3:7")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("\"seq\":\"GTAC\""));
    assert!(stdout.contains("\"gaps\":{\"2\":2}"));
    assert!(stdout.contains("\"[2,0]\":\"GG\""));

    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("slice")
        .arg("tests/block/acgt.json")
        .arg("--interval")
        .arg("0:3")
        .output()?;
    assert!(!output.status.success());

    Ok(())
}

#[test]
fn command_concat() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("concat")
        .arg("tests/block/acgt.json")
        .arg("tests/block/acgt.json")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("\"seq\":\"ACGTACGTACGTACGT\""));
    assert!(stdout.contains("\"gaps\":{\"4\":2,\"12\":2}"));
    assert!(stdout.contains("\"1\":{\"3\":\"T\",\"11\":\"T\"}"));
    assert!(stdout.contains("\"2\":{\"5\":2,\"13\":2}"));

    Ok(())
}

#[test]
fn command_revcomp_is_an_involution() -> anyhow::Result<()> {
    let temp_file = NamedTempFile::new()?.into_temp_path();
    let temp_path = temp_file.to_str().unwrap();

    let mut cmd = Command::cargo_bin("panblock")?;
    cmd.arg("revcomp")
        .arg("tests/block/acgt.json")
        .arg("-o")
        .arg(temp_path)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd.arg("revcomp").arg(temp_path).output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let original = std::fs::read_to_string("tests/block/acgt.json")?;
    assert_eq!(stdout.trim(), original.trim());

    Ok(())
}

#[test]
fn command_reconsensus_leaves_shallow_blocks_alone() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("reconsensus")
        .arg("tests/block/acgt.json")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let original = std::fs::read_to_string("tests/block/acgt.json")?;
    assert_eq!(stdout.trim(), original.trim());

    Ok(())
}

#[test]
fn command_combine() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("combine")
        .arg("tests/block/qry.json")
        .arg("tests/block/ref.json")
        .arg("--cigar")
        .arg("4M")
        .arg("--qry")
        .arg("1:5")
        .arg("--ref")
        .arg("1:5")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.starts_with("[{\"kind\":\"shared\","));
    assert!(stdout.contains("\"seq\":\"ACCT\""));
    assert!(stdout.contains("\"mutate\":{\"1\":{\"3\":\"G\"},\"2\":{}}"));

    Ok(())
}

#[test]
fn command_combine_splits_long_indels() -> anyhow::Result<()> {
    let qry = NamedTempFile::new()?;
    let refr = NamedTempFile::new()?;
    std::fs::write(
        qry.path(),
        r#"{"id":"21","seq":"ACGTTTTTTACG","gaps":{},"mutate":{"1":{}},"insert":{"1":{}},"delete":{"1":{}}}"#,
    )?;
    std::fs::write(
        refr.path(),
        r#"{"id":"22","seq":"ACGACG","gaps":{},"mutate":{"2":{}},"insert":{"2":{}},"delete":{"2":{}}}"#,
    )?;

    let mut cmd = Command::cargo_bin("panblock")?;
    let output = cmd
        .arg("combine")
        .arg(qry.path())
        .arg(refr.path())
        .arg("--cigar")
        .arg("3M6I3M")
        .arg("--qry")
        .arg("1:13")
        .arg("--ref")
        .arg("1:7")
        .arg("--maxgap")
        .arg("5")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.matches("\"kind\":\"shared\"").count(), 2);
    assert_eq!(stdout.matches("\"kind\":\"qry-only\"").count(), 1);
    assert!(stdout.contains("\"seq\":\"TTTTTT\""));

    Ok(())
}
