use std::process::Command;

/// Run git and return trimmed stdout, or `None` if git failed.
fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
    println!("cargo:rerun-if-changed=.git/refs/tags/");

    let version = env!("CARGO_PKG_VERSION");

    // Tagged commits report the bare package version
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    let build_version = if on_tag {
        version.to_string()
    } else {
        let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
        let dirty = git(&["status", "--porcelain"]).is_some_and(|out| !out.is_empty());
        let suffix = if dirty { "-dirty" } else { "" };
        format!("{version}-dev ({hash}{suffix})")
    };

    println!("cargo:rustc-env=IMPACTWATCH_BUILD_VERSION={build_version}");
}
