use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn post(title: &str, date: &str) -> String {
    format!(
        r#"<ul class="nav-links">
    <li><a href="../../benedict/">Benedict</a></li>
</ul>
<header class="post-header"><h1>{title}</h1><time datetime="{date}">{date}</time></header>
<div class="post-content"><p>About {title}.</p></div>
</article>
<nav class="post-nav"><span></span><span></span></nav>
"#
    )
}

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (slug, title, date) in [("ides", "Ides", "2024-03-15"), ("new-year", "New Year", "2024-01-01")] {
        let dir = tmp.path().join("posts").join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.html"), post(title, date)).unwrap();
    }
    tmp
}

#[test]
fn gen_config_prints_stock_toml() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nightbeans");
    cmd.arg("gen-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[reviews]"))
        .stdout(predicate::str::contains("excerpt_chars = 150"));
}

#[test]
fn check_lists_posts_without_writing() {
    let tmp = site();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nightbeans");
    cmd.arg("--root")
        .arg(tmp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Posts (2)"))
        .stdout(predicate::str::contains("001 Ides"))
        .stdout(predicate::str::contains("Reviews (0)"));
    assert!(!tmp.path().join("blog-posts.js").exists());
}

#[test]
fn build_writes_data_files() {
    let tmp = site();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nightbeans");
    cmd.args(["build", "--root"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("blog-posts.js (2 posts)"))
        .stdout(predicate::str::contains("Build complete"));

    let data = fs::read_to_string(tmp.path().join("blog-posts.js")).unwrap();
    assert!(data.contains("const blogPosts = ["));
    let page = fs::read_to_string(tmp.path().join("posts/ides/index.html")).unwrap();
    assert!(page.contains(r#"<a href="../new-year/">New Year →</a>"#));
}

#[test]
fn logs_go_to_stderr() {
    let tmp = site();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nightbeans");
    cmd.env("RUST_LOG", "debug")
        .arg("--root")
        .arg(tmp.path())
        .arg("build")
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote data file"))
        .stdout(predicate::str::contains("wrote data file").not());
}

#[test]
fn invalid_config_fails() {
    let tmp = site();
    fs::write(tmp.path().join("site.toml"), "[chapters]\nexcerpt_chars = 0\n").unwrap();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nightbeans");
    cmd.arg("--root")
        .arg(tmp.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("excerpt_chars"));
}

#[test]
fn retemplate_then_migrate_report() {
    let tmp = site();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nightbeans");
    cmd.arg("--root")
        .arg(tmp.path())
        .arg("retemplate-nav")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 2 posts, 0 already migrated, 0 failed"));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("nightbeans");
    cmd.arg("--root")
        .arg(tmp.path())
        .arg("migrate-urls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to migrate"));
}
