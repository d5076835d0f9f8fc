use metshard::shard::*;
use std::path::PathBuf;

#[test]
fn default_layout_matches_documented_example() -> anyhow::Result<()> {
    let layout = ShardLayout::new("_data", 10, 2, 4)?;
    assert_eq!(
        layout.file_path("3168449")?,
        PathBuf::from("_data/00/03/16/84/0003168449.json")
    );
    Ok(())
}

#[test]
fn path_depends_only_on_padded_form() -> anyhow::Result<()> {
    let layout = ShardLayout::new("root", 10, 2, 4)?;
    // "0042" and "42" pad to the same string
    assert_eq!(layout.file_path("42")?, layout.file_path("0042")?);
    assert_eq!(layout.file_path("42")?, layout.file_path("42")?);
    assert_ne!(layout.file_path("42")?, layout.file_path("43")?);
    Ok(())
}

#[test]
fn ids_sharing_first_eight_digits_share_a_directory() -> anyhow::Result<()> {
    let layout = ShardLayout::new("root", 10, 2, 4)?;
    let a = layout.dir_for("123456700")?;
    let b = layout.dir_for("123456799")?;
    let c = layout.dir_for("123456800")?;
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(layout.relative_dir("123456700")?, PathBuf::from("01/23/45/67"));
    Ok(())
}

#[test]
fn long_ids_are_sliced_from_the_front() -> anyhow::Result<()> {
    let layout = ShardLayout::new("root", 10, 2, 4)?;
    assert_eq!(
        layout.file_path("123456789012")?,
        PathBuf::from("root/12/34/56/78/123456789012.json")
    );
    Ok(())
}

#[test]
fn empty_id_pads_to_zeros() -> anyhow::Result<()> {
    let layout = ShardLayout::new("root", 10, 2, 4)?;
    assert_eq!(
        layout.file_path("")?,
        PathBuf::from("root/00/00/00/00/0000000000.json")
    );
    Ok(())
}

#[test]
fn ensure_dir_is_idempotent() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let layout = ShardLayout::new(tmp.path(), 10, 2, 4)?;
    let first = layout.ensure_dir("3168449")?;
    let second = layout.ensure_dir("3168449")?;
    assert_eq!(first, second);
    assert!(first.is_dir());
    assert_eq!(first, tmp.path().join("00").join("03").join("16").join("84"));
    Ok(())
}

#[test]
fn pure_paths_do_not_create_directories() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let layout = ShardLayout::new(tmp.path(), 10, 2, 4)?;
    let path = layout.file_path("1")?;
    assert!(!path.parent().unwrap().exists());
    Ok(())
}

#[test]
fn custom_geometry() -> anyhow::Result<()> {
    let layout = ShardLayout::new("r", 6, 3, 2)?;
    assert_eq!(layout.file_path("1234")?, PathBuf::from("r/001/234/001234.json"));
    assert!(ShardLayout::new("r", 5, 3, 2).is_err());
    Ok(())
}

#[test]
fn path_escapes_are_rejected() -> anyhow::Result<()> {
    let layout = ShardLayout::new("root", 10, 2, 4)?;
    assert!(layout.file_path("../../etc/passwd").is_err());
    assert!(layout.ensure_dir("a/b").is_err());
    Ok(())
}

#[test]
fn dot_identifiers_cannot_climb_out_of_root() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("a").join("b").join("_data");
    let layout = ShardLayout::new(&root, 10, 2, 4)?;

    // "00........" would slice into 00/../../..
    assert!(layout.relative_dir("........").is_err());
    assert!(layout.file_path("..........").is_err());
    assert!(layout.ensure_dir("........").is_err());
    assert!(!root.exists());
    // a lone dot next to a digit is still a plain name
    assert_eq!(layout.relative_dir("1.")?, PathBuf::from("00/00/00/00"));
    Ok(())
}

#[test]
fn multibyte_ids_are_sliced_by_char() -> anyhow::Result<()> {
    let layout = ShardLayout::new("root", 10, 2, 4)?;
    assert_eq!(layout.segments("ééé")?, vec!["00", "00", "00", "0é"]);
    assert_eq!(
        layout.file_path("日本語のID")?,
        PathBuf::from("root/00/00/日本/語の/0000日本語のID.json")
    );
    Ok(())
}
