use std::env;
use std::process::Command;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let commit_full = env::var("GITHUB_SHA").ok().filter(|v| !v.is_empty());
    let commit_full = commit_full.or_else(|| run_git(&["rev-parse", "HEAD"]));
    let commit_full = commit_full.unwrap_or_else(|| "unknown".to_string());

    let commit_short = if commit_full != "unknown" {
        shorten_commit(&commit_full)
    } else {
        "unknown".to_string()
    };

    // Outside a checkout, stamp the build time instead of the commit time.
    let build_date = run_git(&["log", "-1", "--format=%cI"])
        .or_else(|| OffsetDateTime::now_utc().format(&Rfc3339).ok())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=METERLINK_BUILD_COMMIT={}", commit_short);
    println!(
        "cargo:rustc-env=METERLINK_BUILD_COMMIT_FULL={}",
        commit_full
    );
    println!("cargo:rustc-env=METERLINK_BUILD_DATE={}", build_date);
}

fn run_git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

fn shorten_commit(full: &str) -> String {
    full.chars().take(7).collect()
}
