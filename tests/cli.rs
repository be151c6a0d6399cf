//  ██████╗██╗     ██╗
// ██╔════╝██║     ██║
// ██║     ██║     ██║
// ██║     ██║     ██║
// ╚██████╗███████╗██║
//  ╚═════╝╚══════╝╚═╝

#[cfg(test)]
mod cli {
    use std::fs;

    use assert_cmd::Command;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "RESTYLER_CONFIG",
        "RESTYLER_LOG_LEVEL",
        "RESTYLER_DEFAULT_LOCALE",
        "RESTYLER_SITE_DOMAIN",
        "RESTYLER_ALLOWED_ATTRIBUTES",
        "RESTYLER_RESTORE_MODE",
        "RESTYLER_WORKER_THREADS",
    ];

    fn restyler(dir: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("restyler").unwrap();
        cmd.current_dir(dir.path());
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    fn stdout_of(output: &std::process::Output) -> String {
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    #[test]
    fn sanitize_from_stdin() {
        let dir = TempDir::new().unwrap();
        let assert = restyler(&dir)
            .arg("sanitize")
            .write_stdin("<p class=\"a\" id=\"b\">Hi</p>")
            .assert()
            .success();

        assert_eq!(stdout_of(assert.get_output()), "<p id=\"b\">Hi</p>\n");
    }

    #[test]
    fn sanitize_with_keep_and_encoding() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        fs::write(&input, b"<p class=\"a\" id=\"b\">caf\xe9</p>").unwrap();

        let assert = restyler(&dir)
            .args(["sanitize", "--keep", "class", "--encoding", "windows-1252"])
            .arg(&input)
            .assert()
            .success();

        assert_eq!(stdout_of(assert.get_output()), "<p class=\"a\">café</p>\n");
    }

    #[test]
    fn extract_body_without_body_is_client_error() {
        let dir = TempDir::new().unwrap();
        restyler(&dir)
            .arg("extract-body")
            .write_stdin("<p>no body here</p>")
            .assert()
            .code(2);
    }

    #[test]
    fn extract_body_prints_json() {
        let dir = TempDir::new().unwrap();
        let assert = restyler(&dir)
            .arg("extract-body")
            .write_stdin("<html><body id=\"x\"><p style=\"s\">Hi</p></body></html>")
            .assert()
            .success();

        let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(json["clean_body"], "<body><p>Hi</p></body>");
        assert_eq!(json["original_body"], "<body id=\"x\"><p style=\"s\">Hi</p></body>");
    }

    #[test]
    fn restore_from_files() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("original.html");
        let translated = dir.path().join("translated.html");
        fs::write(&original, "<p class=\"x\">Hello <b>World</b></p>").unwrap();
        fs::write(&translated, "<p>Bonjour <b>Monde</b></p>").unwrap();

        let assert = restyler(&dir)
            .arg("restore")
            .arg("--original")
            .arg(&original)
            .arg("--translated")
            .arg(&translated)
            .args(["--mode", "recursive"])
            .assert()
            .success();

        assert_eq!(
            stdout_of(assert.get_output()),
            "<p class=\"x\">Bonjour <b>Monde</b></p>\n"
        );
    }

    #[test]
    fn rewrite_links_needs_site_domain() {
        let dir = TempDir::new().unwrap();
        restyler(&dir)
            .args(["rewrite-links", "--lang", "de"])
            .write_stdin("<a href=\"/about\">About</a>")
            .assert()
            .code(2);

        let assert = restyler(&dir)
            .args(["rewrite-links", "--lang", "de", "--site-domain", "example.com"])
            .write_stdin("<a href=\"/about\">About</a>")
            .assert()
            .success();
        assert_eq!(
            stdout_of(assert.get_output()),
            "<a href=\"/de/about\">About</a>\n"
        );
    }

    #[test]
    fn rewrite_links_uses_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("restyler.toml"),
            "site_domain = \"gegidze.com\"\ndefault_locale = \"ka\"\n",
        )
        .unwrap();

        let assert = restyler(&dir)
            .args(["rewrite-links", "--lang", "ka"])
            .write_stdin("<a href=\"https://gegidze.com/x\">x</a>")
            .assert()
            .success();
        assert_eq!(
            stdout_of(assert.get_output()),
            "<a href=\"https://gegidze.com/x\">x</a>\n"
        );
    }

    #[test]
    fn handle_reports_missing_input_as_json() {
        let dir = TempDir::new().unwrap();
        let assert = restyler(&dir)
            .args(["handle", "--op", "restore-styles"])
            .write_stdin("{\"original_html\": \"<p>a</p>\"}")
            .assert()
            .code(2);

        let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("translated_html"));
    }

    #[test]
    fn handle_success() {
        let dir = TempDir::new().unwrap();
        let assert = restyler(&dir)
            .args(["handle", "--op", "sanitize"])
            .write_stdin("{\"html\": \"<b style='x'>bold</b>\"}")
            .assert()
            .success();

        let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["clean_html"], "<b>bold</b>");
    }

    #[test]
    fn batch_outputs_one_line_per_item() {
        let dir = TempDir::new().unwrap();
        let input = concat!(
            "{\"op\": \"sanitize\", \"html\": \"<i class='a'>1</i>\"}\n",
            "{\"op\": \"extract-body\", \"html\": \"<p>2</p>\"}\n",
            "not json\n",
            "{\"op\": \"rebuild-styles\", \"original_body\": \"<p class='k'>One</p>\", \"translated_text\": \"<p>Uno</p>\"}\n",
        );

        let assert = restyler(&dir).arg("batch").write_stdin(input).assert().success();

        let lines: Vec<serde_json::Value> = stdout_of(assert.get_output())
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["clean_html"], "<i>1</i>");
        assert_eq!(lines[1]["success"], false);
        assert_eq!(lines[2]["success"], false);
        assert_eq!(lines[3]["translated_html"], "<p class=\"k\">Uno</p>");
    }

    #[test]
    fn init_config_writes_loadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("generated.toml");

        restyler(&dir).arg("init-config").arg(&path).assert().success();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("site_domain = \"example.com\""));

        restyler(&dir)
            .arg("--config")
            .arg(&path)
            .args(["rewrite-links", "--lang", "fr"])
            .write_stdin("<a href=\"/\">home</a>")
            .assert()
            .success();
    }

    #[test]
    fn broken_config_is_not_a_client_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "worker_threads = \"many\"").unwrap();

        restyler(&dir)
            .arg("--config")
            .arg(&path)
            .arg("sanitize")
            .write_stdin("<p>x</p>")
            .assert()
            .code(1);
    }
}
