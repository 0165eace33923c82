use fraglabel_cli::input::Input;
use fraglabel_cli::runner::Runner;
use std::path::PathBuf;

const TABLE: &str = "m/z\tz\tIntensity\tPeptide #\tIon Type\tIndex\tCharge\tElem Comp\tError\n\
    \t\t1\t\t\t\t\t\t\n\
    300.1\t1\t100\t1\tb\t1\t1\t\t\n\
    \t\t1\t\t\t\t\t\t\n\
    304.1\t1\t300\t2\tb\t1\t1\t\t\n\
    \t\t1\t\t\t\t\t\t\n\
    250.2\t1\t200\t2\ty\t2\t1\t\t\n\
    \t\t1\t\t\t\t\t\t\n";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fraglabel-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn integration() -> anyhow::Result<()> {
    let dir = scratch_dir("integration");
    let table = dir.join("sample.tsv");
    std::fs::write(&table, TABLE)?;

    let parameters = serde_json::json!({
        "sequence": "*AB*",
        "tsv_paths": [table.to_string_lossy()],
        "output_directory": dir.join("out").to_string_lossy(),
    });
    let input: Input = serde_json::from_value(parameters)?;
    let settings = Runner::new(input.build()?).run()?;

    // three outputs per table + results.json
    assert_eq!(settings.output_paths.len(), 4);
    for path in &settings.output_paths {
        assert!(std::path::Path::new(path).exists(), "{path} was not written");
    }

    let out = dir.join("out");
    let script = std::fs::read_to_string(out.join("sample.color-script.txt"))?;
    assert_eq!(
        script,
        "select 1\n---\nselect 2\ncolor [255, 127.5, 127.5]\nselect 3\n---\nselect 4\n---\n"
    );

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(out.join("sample.processed-fragment-intensities.csv"))?;
    let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[1][0], "2 (A)");
    assert_eq!(&rows[1][1], "100.0");
    assert_eq!(&rows[1][2], "300.0");
    assert_eq!(&rows[1][3], "0.25");
    assert_eq!(&rows[1][7], "1.0");
    assert_eq!(&rows[1][9], "500.0");
    assert_eq!(&rows[0][10], "---");
    assert_eq!(&rows[2][8], "---");
    assert_eq!(&rows[2][11], "---");

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(out.join("sample.fragment-intensities.csv"))?;
    let grid = rdr.records().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(grid.len(), 3 + 4);
    assert_eq!(&grid[0][1], "n-terminal");
    assert_eq!(&grid[0][26], "c-terminal");
    assert_eq!(&grid[2][5], "b");
    // position 1, n-terminal unlabeled b
    assert_eq!(&grid[4][0], "2 (A)");
    assert_eq!(&grid[4][5], "100.0");
    assert_eq!(&grid[4][25], "3 (A)");
    // y2, labeled, counted from the c-terminal end
    assert_eq!(&grid[2][42], "y");
    assert_eq!(&grid[4][42], "200.0");
    assert_eq!(&grid[3][42], "");

    let results = std::fs::read_to_string(out.join("results.json"))?;
    let json: serde_json::Value = serde_json::from_str(&results)?;
    assert_eq!(json["sequence"], "*AB*");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn same_file_names() -> anyhow::Result<()> {
    let dir = scratch_dir("same-names");
    let mut tables = Vec::new();
    for sub in ["a", "b"] {
        std::fs::create_dir_all(dir.join(sub))?;
        let table = dir.join(sub).join("sample.tsv");
        std::fs::write(&table, TABLE)?;
        tables.push(table.to_string_lossy().into_owned());
    }

    let input: Input = serde_json::from_value(serde_json::json!({
        "sequence": "*AB*",
        "tsv_paths": tables,
        "output_directory": dir.join("out").to_string_lossy(),
    }))?;
    let settings = Runner::new(input.build()?).run()?;

    assert_eq!(settings.output_paths.len(), 7);
    let unique = settings
        .output_paths
        .iter()
        .collect::<std::collections::HashSet<_>>();
    assert_eq!(unique.len(), 7);
    for path in &settings.output_paths {
        assert!(std::path::Path::new(path).exists(), "{path} was not written");
    }

    let out = dir.join("out");
    assert!(out.join("sample.0.color-script.txt").exists());
    assert!(out.join("sample.1.color-script.txt").exists());
    assert!(!out.join("sample.color-script.txt").exists());

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn unreadable_table() -> anyhow::Result<()> {
    let dir = scratch_dir("unreadable");
    let input: Input = serde_json::from_value(serde_json::json!({
        "tsv_paths": [dir.join("missing.tsv").to_string_lossy()],
        "output_directory": dir.to_string_lossy(),
    }))?;
    let err = Runner::new(input.build()?).run().unwrap_err();
    assert!(err.to_string().contains("missing.tsv"));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
