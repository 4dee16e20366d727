//! Loading from a relative plugin directory
//!
//! Kept in its own test binary because it changes the working directory.

#![cfg(unix)]

use plugbot::dispatch::Action;
use plugbot::{Dispatcher, PluginLoader, PluginStatus, Update};

mod common;
use common::write_plugin;

#[tokio::test]
async fn exec_route_runs_from_relative_plugin_dir() {
    let root = tempfile::tempdir().unwrap();
    std::env::set_current_dir(root.path()).unwrap();

    let dir = std::path::Path::new("plugins");
    std::fs::create_dir(dir).unwrap();
    std::fs::write(dir.join("hi.sh"), "#!/bin/bash\ncat > /dev/null\necho hi\n").unwrap();
    write_plugin(dir, "hi.toml", "[[router.commands]]\ncommand = \"hi\"\nexec = \"hi.sh\"\n");

    let report = PluginLoader::new("plugins").load().unwrap();
    assert_eq!(report.descriptors[0].status, PluginStatus::Loaded);

    let Action::Exec(handler) = &report.routers[0].commands()[0].action else {
        panic!("expected exec action");
    };
    assert!(handler.path.is_absolute());

    let dispatcher = Dispatcher::with_routers(report.routers);
    let update = Update {
        chat_id: 7,
        sender: "erin".to_string(),
        text: "/hi".to_string(),
    };

    let reply = dispatcher.handle(&update).await.unwrap();
    assert_eq!(reply.as_deref(), Some("hi"));
}
