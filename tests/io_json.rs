use metshard::io::json::*;
use metshard::Record;
use std::fs;

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn write_then_read_gives_same_record() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rec.json");
    let rec = record(&[
        ("Object ID", "3168449"),
        ("Title", "Tête \"d'homme\"\n"),
        ("Object Date", ""),
    ]);

    write_record_json(&path, &rec)?;
    assert_eq!(read_record_json(&path)?, rec);
    Ok(())
}

#[test]
fn output_is_sorted_and_four_space_indented() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rec.json");
    let rec = record(&[("b", "2"), ("a", "1")]);

    let n = write_record_json(&path, &rec)?;
    let contents = fs::read_to_string(&path)?;
    assert_eq!(contents, "{\n    \"a\": \"1\",\n    \"b\": \"2\"\n}");
    assert_eq!(n, contents.len());
    Ok(())
}

#[test]
fn existing_file_is_overwritten() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rec.json");
    fs::write(&path, "x".repeat(500))?;

    write_record_json(&path, &record(&[("a", "1")]))?;
    assert_eq!(read_record_json(&path)?, record(&[("a", "1")]));
    Ok(())
}

#[test]
fn parent_dirs_are_created() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("sub").join("dir").join("rec.json");
    write_record_json(&path, &record(&[("a", "1")]))?;
    assert!(path.exists());
    Ok(())
}

#[test]
fn non_string_values_fail_to_read() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("bad.json");
    fs::write(&path, "{\"a\": 1}")?;
    let err = read_record_json(&path).unwrap_err();
    assert!(format!("{err:?}").contains("parse JSON record"));
    Ok(())
}
