use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string()).filter(|s| !s.is_empty())
}

fn main() {
    for watched in ["../../.git/HEAD", "../../.git/index"] {
        println!("cargo:rerun-if-changed={}", watched);
    }

    // `a1b2c3d` or `a1b2c3d-dirty`; tarball builds have no repository
    let build = git(&["describe", "--always", "--dirty", "--abbrev=7"]).unwrap_or_else(|| "source".into());
    println!("cargo:rustc-env=BPARAM_BUILD={}", build);

    let target = std::env::var("TARGET").unwrap_or_default();
    println!("cargo:rustc-env=BPARAM_TARGET={}", target);
}
