//! Exit code and environment propagation through a stub host.
//!
//! Kept as a single test so no other test forks while the stub script is
//! being written.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use plant_runner::{Orchestrator, RunConfig};

fn write_stub(dir: &Path, name: &str, last_line: &str) -> PathBuf {
    let path = dir.join(name);
    let body = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > args.txt\nenv > env.txt\npwd > cwd.txt\n{last_line}\n"
    );
    std::fs::write(&path, body).expect("write stub");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

fn env_value(dump: &str, key: &str) -> Option<String> {
    dump.lines()
        .find_map(|line| line.strip_prefix(&format!("{key}=")).map(str::to_string))
}

#[tokio::test]
async fn test_exit_code_and_overlay_reach_the_host() {
    let temp = tempfile::tempdir().expect("tempdir");
    let inputs = temp.path().join("inputs");
    std::fs::create_dir_all(&inputs).expect("mkdir");
    for name in ["proj.xml", "meta.json", "plugin.so"] {
        std::fs::write(inputs.join(name), b"").expect("touch input");
    }

    let orchestrator = Orchestrator::new();

    for (code, save_changes) in [(0, true), (1, false), (42, true)] {
        let stub = write_stub(
            temp.path(),
            &format!("acad-stub-{code}"),
            &format!("exit {code}"),
        );
        let config = RunConfig {
            acad_exe: stub,
            project_xml: inputs.join("proj.xml"),
            json_in: inputs.join("meta.json"),
            plugin_dll: inputs.join("plugin.so"),
            workdir: temp.path().join(format!("run-{code}")),
            save_changes,
        };

        let returned = orchestrator.run(&config).await.expect("run");
        assert_eq!(returned, code);

        let args = std::fs::read_to_string(config.workdir.join("args.txt")).expect("args");
        let script_path = config.workdir.join("run_rev2.scr");
        assert_eq!(
            args.lines().collect::<Vec<_>>(),
            vec!["/product", "PLNT3D", "/b", script_path.to_str().expect("utf-8")]
        );

        let cwd = std::fs::read_to_string(config.workdir.join("cwd.txt")).expect("cwd");
        let expected_cwd = std::fs::canonicalize(&config.workdir).expect("canonical workdir");
        assert_eq!(
            std::fs::canonicalize(cwd.trim()).expect("canonical cwd"),
            expected_cwd
        );

        let env = std::fs::read_to_string(config.workdir.join("env.txt")).expect("env");
        assert_eq!(
            env_value(&env, "PLANT_PROJECT_XML").as_deref(),
            config.project_xml.to_str()
        );
        assert_eq!(
            env_value(&env, "PLANT_JSON_IN").as_deref(),
            config.json_in.to_str()
        );
        assert_eq!(
            env_value(&env, "PLANT_SAVE_CHANGES").as_deref(),
            Some(if save_changes { "1" } else { "0" })
        );

        let log = PathBuf::from(env_value(&env, "PLANT_LOG_PATH").expect("log path"));
        assert_eq!(log.parent(), Some(config.workdir.as_path()));

        // Inherited variables survive the overlay.
        assert!(env_value(&env, "PATH").is_some());
    }

    // A host killed by a signal reports the negated signal number.
    let killed = RunConfig {
        acad_exe: write_stub(temp.path(), "acad-stub-killed", "kill -9 $$"),
        project_xml: inputs.join("proj.xml"),
        json_in: inputs.join("meta.json"),
        plugin_dll: inputs.join("plugin.so"),
        workdir: temp.path().join("run-killed"),
        save_changes: true,
    };
    let returned = orchestrator.run(&killed).await.expect("run");
    assert_eq!(returned, -9);
}
