//! End-to-end tests for the `schedview` binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const TASKS: &str = r#"[
  {"id": "1", "name": "Sondagem", "start": "2025-08-04", "end": "2025-08-08",
   "progress": 100, "status": "concluida"},
  {"id": "2", "name": "Projeto executivo", "start": "2025-08-11", "end": "2025-08-29",
   "progress": 20, "status": "em_andamento", "predecessors": ["1"]},
  {"id": "3", "name": "Aprovação", "start": "2025-09-01", "end": "2025-09-01",
   "isMilestone": true, "status": "planejada", "predecessors": ["2"]}
]"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tasks.json"), TASKS).unwrap();
        fs::write(
            dir.path().join("schedview.toml"),
            "[preferences]\npath = \"prefs.json\"\n",
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_schedview"))
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .env_remove("SCHEDVIEW_CONFIG")
            .args(args)
            .output()
            .expect("failed to run schedview")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn bars_prints_primitive_json() {
    let ws = Workspace::new();
    let output = ws.run(&["bars", "tasks.json"]);
    assert!(output.status.success());

    let bars: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let bars = bars.as_array().unwrap();
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0]["custom_class"], "bar-completed");
    assert_eq!(bars[1]["dependencies"], "1");
    assert_eq!(bars[2]["custom_class"], "bar-milestone");
    assert_eq!(bars[2]["start"], "2025-09-01");
}

#[test]
fn render_writes_dual_pane_page() {
    let ws = Workspace::new();
    let output = ws.run(&[
        "render",
        "tasks.json",
        "-o",
        "out.html",
        "--mode",
        "day",
        "--no-legend",
        "--width",
        "1400",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let html = read(&ws.path("out.html"));
    assert!(html.contains(r#"id="table-pane""#));
    assert!(html.contains(r#"id="timeline-pane""#));
    assert!(html.contains("viewBox"));
    assert!(html.contains(r#"data-mode="day""#));
    assert!(!html.contains(r#"id="legend""#));
    assert!(stdout(&output).contains("Rendered 3 tasks (day view)"));
}

#[test]
fn render_rejects_unknown_theme() {
    let ws = Workspace::new();
    let output = ws.run(&["render", "tasks.json", "-o", "out.html", "--theme", "neon"]);
    assert!(!output.status.success());
    assert!(!ws.path("out.html").exists());
}

#[test]
fn column_edits_persist_between_runs() {
    let ws = Workspace::new();

    assert!(ws.run(&["columns", "toggle", "duracao"]).status.success());
    assert!(ws.run(&["columns", "move", "5", "4"]).status.success());

    let stored: serde_json::Value = serde_json::from_str(&read(&ws.path("prefs.json"))).unwrap();
    let columns: Vec<String> =
        serde_json::from_str(stored["gantt_visible_columns"].as_str().unwrap()).unwrap();
    assert_eq!(
        columns,
        vec!["numero", "nome", "inicio", "termino", "responsavel", "progresso"]
    );

    let listing = stdout(&ws.run(&["columns", "list"]));
    assert!(listing.contains("[ ]    duracao"));

    // the rendered table follows the stored order
    assert!(ws.run(&["render", "tasks.json", "-o", "out.html"]).status.success());
    let html = read(&ws.path("out.html"));
    let responsavel = html.find(r#"<th data-index="4" data-column="responsavel""#);
    assert!(responsavel.is_some());
}

#[test]
fn mandatory_column_cannot_be_hidden() {
    let ws = Workspace::new();
    let output = ws.run(&["columns", "toggle", "nome"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("stays visible"));
    // opening the store seeded the default set, without `nome` removed
    let stored: serde_json::Value = serde_json::from_str(&read(&ws.path("prefs.json"))).unwrap();
    let columns: Vec<String> =
        serde_json::from_str(stored["gantt_visible_columns"].as_str().unwrap()).unwrap();
    assert_eq!(columns.len(), 7);
    assert_eq!(columns[1], "nome");
}

#[test]
fn unknown_column_is_an_error() {
    let ws = Workspace::new();
    assert!(!ws.run(&["columns", "toggle", "custo"]).status.success());
    assert!(!ws.run(&["columns", "move", "12", "0"]).status.success());
}

#[test]
fn reset_restores_defaults() {
    let ws = Workspace::new();
    ws.run(&["columns", "toggle", "equipe"]);
    assert!(ws.run(&["columns", "reset"]).status.success());
    let listing = stdout(&ws.run(&["columns"]));
    assert!(listing.contains("[ ]    equipe"));
}

#[test]
fn missing_task_file_fails() {
    let ws = Workspace::new();
    let output = ws.run(&["bars", "nope.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
}
