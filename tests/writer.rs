use metshard::{read_record_json, Record, RecordWriter, ShardLayout};

fn record(id: &str, title: &str) -> Record {
    [("Object ID", id), ("Title", title)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn writer_in(root: &std::path::Path) -> anyhow::Result<RecordWriter> {
    Ok(RecordWriter::new(ShardLayout::new(root, 10, 2, 4)?, "Object ID"))
}

#[test]
fn write_places_record_at_shard_path() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let writer = writer_in(tmp.path())?;
    let rec = record("3168449", "Vase");

    let (path, bytes) = writer.write(&rec)?;
    assert_eq!(path, tmp.path().join("00/03/16/84/0003168449.json"));
    assert_eq!(path, writer.path_for(&rec)?);
    assert_eq!(bytes as u64, std::fs::metadata(&path)?.len());
    assert_eq!(read_record_json(&path)?, rec);
    Ok(())
}

#[test]
fn rewriting_overwrites_unconditionally() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let writer = writer_in(tmp.path())?;

    writer.write(&record("5", "A much longer original title"))?;
    let (path, _) = writer.write(&record("5", "Short"))?;
    assert_eq!(read_record_json(&path)?["Title"], "Short");
    Ok(())
}

#[test]
fn missing_identifier_is_an_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let writer = writer_in(tmp.path())?;
    let mut rec = record("1", "x");
    rec.remove("Object ID");
    let err = writer.write(&rec).unwrap_err();
    assert!(format!("{err:?}").contains("Object ID"));
    Ok(())
}

#[test]
fn write_all_counts_and_stops_at_first_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let writer = writer_in(tmp.path())?;

    let totals = writer.write_all(vec![Ok(record("1", "a")), Ok(record("2", "b"))])?;
    assert_eq!(totals.records, 2);
    assert!(totals.bytes > 0);

    let mut bad = record("3", "c");
    bad.remove("Object ID");
    let err = writer
        .write_all(vec![Ok(record("4", "d")), Ok(bad), Ok(record("5", "e"))])
        .unwrap_err();
    assert!(format!("{err:?}").contains("write record #2"));
    assert!(writer.path_for(&record("4", "d"))?.exists());
    assert!(!writer.path_for(&record("5", "e"))?.exists());
    Ok(())
}
