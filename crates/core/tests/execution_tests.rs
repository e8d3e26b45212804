use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tso_core::{ExecutionError, FileErrorKind, FileKind, NormalizeError, RunConfig};

const UNSORTED_MODULE: &str = "@NgModule({ declarations: [Charlie, Al, Bob] })\nexport class AppModule {}\n";
const SORTED_MODULE: &str = "@NgModule({ declarations: [\n  Al,\n  Bob,\n  Charlie,\n] })\nexport class AppModule {}\n";
const UNSORTED_RECORD: &str = "export class UserDto {\n  constructor() {}\n  email: string;\n  id: number;\n}\n";
const UNSORTED_MARKUP: &str = "<div aria-label=\"x\" id=\"y\" data-foo=\"z\"></div>\n";
const SORTED_MARKUP: &str = "<div id=\"y\" data-foo=\"z\" aria-label=\"x\"></div>\n";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn test_collect_files_by_kind() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/b.module.ts", UNSORTED_MODULE);
    write(root, "src/a.module.ts", UNSORTED_MODULE);
    write(root, "src/user.dto.ts", UNSORTED_RECORD);
    write(root, "src/main.ts", "console.log('hi');\n");
    write(root, "src/index.html", UNSORTED_MARKUP);
    write(root, "node_modules/lib/lib.module.ts", UNSORTED_MODULE);
    write(root, "node_modules/lib/page.html", UNSORTED_MARKUP);

    let config = RunConfig::new(root);

    let modules = config.collect_files(FileKind::Module).unwrap();
    assert_eq!(
        modules,
        vec![root.join("src/a.module.ts"), root.join("src/b.module.ts")]
    );
    assert_eq!(
        config.collect_files(FileKind::Record).unwrap(),
        vec![root.join("src/user.dto.ts")]
    );
    assert_eq!(
        config.collect_files(FileKind::Markup).unwrap(),
        vec![root.join("src/index.html")]
    );
}

#[test]
fn test_hidden_files_only_selected_for_markup() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, ".storybook/preview.html", UNSORTED_MARKUP);
    write(root, ".storybook/story.module.ts", UNSORTED_MODULE);

    let config = RunConfig::new(root);
    assert_eq!(
        config.collect_files(FileKind::Markup).unwrap(),
        vec![root.join(".storybook/preview.html")]
    );
    assert!(config.collect_files(FileKind::Module).unwrap().is_empty());
}

#[test]
fn test_configured_excludes() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "dist/app.module.ts", UNSORTED_MODULE);
    write(root, "src/app.module.ts", UNSORTED_MODULE);

    let mut config = RunConfig::new(root);
    config.config.selection.exclude = vec!["dist/**".to_string()];

    assert_eq!(
        config.collect_files(FileKind::Module).unwrap(),
        vec![root.join("src/app.module.ts")]
    );
}

#[tokio::test]
async fn test_batch_run_writes_normalized_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "app.module.ts", UNSORTED_MODULE);
    write(root, "user.dto.ts", UNSORTED_RECORD);
    write(root, "index.html", UNSORTED_MARKUP);
    write(root, "done.html", SORTED_MARKUP);

    let report = RunConfig::new(root).execute().await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.stats.files_modified, 3);
    assert_eq!(report.stats.files_unmodified, 1);
    assert_eq!(read(root, "app.module.ts"), SORTED_MODULE);
    assert_eq!(read(root, "index.html"), SORTED_MARKUP);
    assert_eq!(
        read(root, "user.dto.ts"),
        "export class UserDto {\n  id: number;\n  email: string;\n\n  constructor() {}\n}\n"
    );
}

#[tokio::test]
async fn test_dry_run_leaves_files_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "app.module.ts", UNSORTED_MODULE);

    let mut config = RunConfig::new(root);
    config.dry_run = true;
    config.diff.color = false;
    let report = config.execute().await.unwrap();

    assert_eq!(report.stats.files_modified, 1);
    assert_eq!(report.diffs.len(), 1);
    assert!(report.diffs[0].diff_text.contains("+  Charlie,"));
    assert_eq!(read(root, "app.module.ts"), UNSORTED_MODULE);
}

#[tokio::test]
async fn test_bad_file_does_not_block_others() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "broken.module.ts", "export class Broken {}\n");
    write(root, "good.module.ts", UNSORTED_MODULE);
    write(root, "index.html", UNSORTED_MARKUP);

    let report = RunConfig::new(root).execute().await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.stats.files_with_errors, 1);
    assert_eq!(report.stats.files_modified, 2);
    assert_eq!(report.errors[0].path, root.join("broken.module.ts"));
    assert!(matches!(
        report.errors[0].kind,
        FileErrorKind::Normalize(NormalizeError::ShapeMismatch { .. })
    ));
    assert_eq!(read(root, "good.module.ts"), SORTED_MODULE);
    assert_eq!(read(root, "index.html"), SORTED_MARKUP);
}

#[tokio::test]
async fn test_single_file_mode() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "app.module.ts", UNSORTED_MODULE);
    write(root, "page.html", UNSORTED_MARKUP);

    let mut config = RunConfig::new(root);
    config.file = Some(root.join("page.html"));
    let report = config.execute().await.unwrap();

    assert_eq!(report.stats.total_files(), 1);
    assert_eq!(read(root, "page.html"), SORTED_MARKUP);
    assert_eq!(read(root, "app.module.ts"), UNSORTED_MODULE);
}

#[tokio::test]
async fn test_single_file_mode_rejects_unknown_names() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = RunConfig::new(temp_dir.path());
    config.file = Some(temp_dir.path().join("main.ts"));

    let result = config.execute().await;
    assert!(matches!(result, Err(ExecutionError::UnrecognizedFile(_))));
}

#[tokio::test]
async fn test_missing_file_is_a_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = RunConfig::new(temp_dir.path());
    config.file = Some(temp_dir.path().join("gone.dto.ts"));

    let report = config.execute().await.unwrap();
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(report.errors[0].kind, FileErrorKind::Read(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_write_failure_is_a_persistence_fault() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "locked/app.module.ts", UNSORTED_MODULE);
    write(root, "open/page.html", UNSORTED_MARKUP);

    let locked = root.join("locked/app.module.ts");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();
    // Root can write read-only files; nothing to observe then
    if fs::OpenOptions::new().write(true).open(&locked).is_ok() {
        return;
    }

    let report = RunConfig::new(root).execute().await.unwrap();

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].is_persistence_fault());
    assert_eq!(report.stats.files_with_errors, 1);
    assert_eq!(report.stats.files_modified, 1);
    assert_eq!(read(root, "open/page.html"), SORTED_MARKUP);
}
