//! Runtime tests: config file in, scripted surface lines through the loop.

use sanad_common::config::Config;
use sanadd::app::{App, AppEvent};
use sanadd::input::parse_line;
use sanadd::platform::MemorySink;
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Feed `script` through the parser and the running loop, then quit.
async fn run_script(config: Config, script: &[&str]) -> Vec<String> {
    let sink = MemorySink::new();
    let (app, events) = App::new(config, Box::new(sink.clone()));
    let tx = app.sender();
    let runner = tokio::spawn(app.run(events));

    for line in script {
        let event = match parse_line(line) {
            Ok(Some(event)) => AppEvent::Input(event),
            Ok(None) => continue,
            Err(e) => AppEvent::Rejected(e),
        };
        tx.send(event).unwrap();
    }
    tx.send(AppEvent::Shutdown).unwrap();

    tokio::time::timeout(Duration::from_secs(2), runner)
        .await
        .expect("loop did not stop")
        .unwrap();
    sink.lines()
}

#[tokio::test]
async fn test_device_script_from_config_file() {
    let file = write_config(
        r#"
[safety]
seed = 3

[platform]
audio = false
"#,
    );
    let config = Config::load_from_path(file.path()).unwrap();
    assert_eq!(config.safety.seed, Some(3));

    let lines = run_script(
        config,
        &[
            "# living room",
            "register tv1 tv",
            "register tv1 ac",
            "device رفع صوت التلفاز",
            "device شغل التلفاز",
            "device افتح النافذة",
            "unregister 5",
            "fly away",
        ],
    )
    .await;

    assert_eq!(
        lines,
        vec![
            "1. tv1 (tv)",
            "هذا الجهاز مسجل بالفعل",
            "تم رفع الصوت إلى 60",
            "تم تشغيل التلفاز",
            "أمر غير مفهوم: افتح النافذة",
            "لا يوجد عنصر بالرقم 5",
            "أمر غير مفهوم: fly",
        ]
    );
}

#[tokio::test]
async fn test_safety_script_messages() {
    let lines = run_script(
        Config::default(),
        &[
            "obstacle on",
            "safety on",
            "contact add أحمد علي 0500000000",
            "obstacle on",
            "obstacle on",
            "safety off",
        ],
    )
    .await;

    let messages: Vec<&str> = lines
        .iter()
        .map(|l| l.splitn(2, ": ").nth(1).unwrap_or(l.as_str()))
        .collect();
    assert_eq!(
        messages,
        vec![
            "نظام السلامة مفعل",
            "تمت إضافة جهة اتصال طارئة: أحمد علي",
            "تم تفعيل كشف العوائق",
            "تم إيقاف كشف العوائق",
            "نظام السلامة معطل",
        ]
    );
}

#[tokio::test]
async fn test_device_unregistered_type() {
    let lines = run_script(Config::default(), &["device رفع درجة الحرارة"]).await;
    assert_eq!(lines, vec!["الجهاز ac غير مسجل"]);
}
