//! End-to-end console sessions against the real plugin.

use cool_events::{Position, ServerContext};
use cool_server::{AppConfig, CoolServer, Flow};
use std::io::Write;

async fn server_with(config: AppConfig) -> CoolServer {
    let mut server = CoolServer::new(config);
    server.start().await.unwrap();
    server
}

async fn server() -> CoolServer {
    server_with(AppConfig::default()).await
}

/// Runs each line and returns everything printed along the way.
async fn run(server: &mut CoolServer, lines: &[&str]) -> Vec<String> {
    for line in lines {
        assert_eq!(server.handle_line(line).await, Flow::Continue, "{}", line);
    }
    server.take_output()
}

fn contains(output: &[String], line: &str) -> bool {
    output.iter().any(|l| l == line)
}

#[tokio::test]
async fn test_tpa_then_accept_moves_requester() {
    let mut server = server().await;
    run(&mut server, &["join Alice 0 64 0", "join Bob 10 64 10"]).await;

    let output = run(&mut server, &["cmd Alice /tpa bo"]).await;
    assert!(contains(&output, "[Alice] Teleport request sent to Bob"));
    assert!(contains(
        &output,
        "[Bob] Alice wants to teleport to you. Type /tpaccept to accept."
    ));

    let output = run(&mut server, &["cmd Bob tpaccept"]).await;
    assert!(contains(&output, "[Alice] Teleported to Bob!"));
    assert!(contains(&output, "[Bob] Alice has been teleported to you!"));

    let alice = server.host().player_by_name("alice").unwrap();
    assert_eq!(alice.position, Position::new(10.0, 64.0, 10.0));

    // Accepted requests never expire later.
    let output = run(&mut server, &["wait 700"]).await;
    assert!(!output.iter().any(|l| l.contains("expired")));
}

#[tokio::test]
async fn test_request_expires_after_thirty_seconds() {
    let mut server = server().await;
    run(&mut server, &["join Alice", "join Bob", "wait 5", "cmd Alice tpa Bob"]).await;

    let output = run(&mut server, &["wait 599"]).await;
    assert!(!contains(&output, "[Alice] Teleport request to Bob expired."));

    let output = run(&mut server, &["wait 1"]).await;
    assert!(contains(&output, "[Alice] Teleport request to Bob expired."));

    let output = run(&mut server, &["cmd Bob tpaccept"]).await;
    assert!(contains(&output, "[Bob] No pending teleport requests!"));
}

#[tokio::test]
async fn test_configured_expiry_and_overwrite() {
    let mut config = AppConfig::default();
    config.plugins.cool.teleport.expiry_ticks = 40;
    let mut server = server_with(config).await;

    run(
        &mut server,
        &["join Alice", "join Bob", "join Carol", "cmd Alice tpa Bob", "wait 20"],
    )
    .await;
    // Carol replaces Alice's request without Alice hearing about it.
    let output = run(&mut server, &["cmd Carol tpa Bob", "wait 20"]).await;
    assert!(!output.iter().any(|l| l.starts_with("[Alice]")));

    let output = run(&mut server, &["cmd Bob tpaccept"]).await;
    assert!(contains(&output, "[Carol] Teleported to Bob!"));
}

#[tokio::test]
async fn test_requester_leaving_before_accept() {
    let mut server = server().await;
    run(&mut server, &["join Alice", "join Bob", "cmd Alice tpa Bob", "quit Alice"]).await;

    let output = run(&mut server, &["cmd Bob tpaccept"]).await;
    assert!(contains(
        &output,
        "[Bob] The player who requested teleport is no longer online!"
    ));
}

#[tokio::test]
async fn test_expiry_after_target_left_names_the_target() {
    let mut server = server().await;
    run(&mut server, &["join Alice", "join Bob", "cmd Alice tpa Bob", "quit Bob"]).await;

    let output = run(&mut server, &["wait 600"]).await;
    assert_eq!(output, vec!["[Alice] Teleport request to Bob expired."]);
}

#[tokio::test]
async fn test_requester_reconnecting_can_still_be_teleported() {
    let mut server = server().await;
    run(
        &mut server,
        &["join Alice", "join Bob 5 70 5", "cmd Alice tpa Bob", "quit Alice", "join Alice"],
    )
    .await;

    let output = run(&mut server, &["cmd Bob tpaccept"]).await;
    assert!(contains(&output, "[Alice] Teleported to Bob!"));
    assert!(contains(&output, "[Bob] Alice has been teleported to you!"));
    let alice = server.host().player_by_name("Alice").unwrap();
    assert_eq!(alice.position, Position::new(5.0, 70.0, 5.0));
}

#[tokio::test]
async fn test_target_reconnecting_keeps_pending_request() {
    let mut server = server().await;
    run(
        &mut server,
        &["join Alice", "join Bob", "cmd Alice tpa Bob", "quit Bob", "join Bob 1 80 1"],
    )
    .await;

    let output = run(&mut server, &["cmd Bob tpaccept"]).await;
    assert!(contains(&output, "[Alice] Teleported to Bob!"));
    let alice = server.host().player_by_name("Alice").unwrap();
    assert_eq!(alice.position, Position::new(1.0, 80.0, 1.0));
}

#[tokio::test]
async fn test_refused_requests() {
    let mut server = server().await;
    run(&mut server, &["join Alice"]).await;

    let output = run(&mut server, &["cmd Alice tpa alice", "cmd Alice tpa zed"]).await;
    assert!(contains(&output, "[Alice] You cannot teleport to yourself!"));
    assert!(contains(&output, "[Alice] Player not found!"));

    let output = run(&mut server, &["cmd console tpa Alice"]).await;
    assert_eq!(
        output,
        vec!["[console] This command can only be used in-game!".to_string()]
    );
}

#[tokio::test]
async fn test_chat_commands_and_errors() {
    let mut server = server().await;
    let output = run(&mut server, &["join Alice 0 64 0"]).await;
    assert_eq!(output[0], "* Alice joined the game");
    assert!(output
        .iter()
        .any(|l| l.starts_with("[Alice]") && l.ends_with("Welcome to the Cool Server!")));

    let output = run(&mut server, &["say Alice this is COOL", "say Alice hello"]).await;
    assert_eq!(output, vec!["❄ Alice: this is COOL", "<Alice> hello"]);

    let output = run(&mut server, &["cmd Alice dance"]).await;
    assert_eq!(output, vec!["[Alice] Unknown command. Try /cool for help."]);

    let output = run(&mut server, &["use Alice diamond 1 63 1"]).await;
    assert!(contains(&output, "[Alice] ✨ Diamond magic activated! ✨"));
    assert!(contains(&output, "* Alice's interaction was cancelled"));

    let output = run(
        &mut server,
        &["move Alice 3 64 4", "break Alice 0 63 0", "place Alice 0 63 0", "cmd Alice stats"],
    )
    .await;
    assert!(contains(&output, "[Alice] Blocks Broken: 1"));
    assert!(contains(&output, "[Alice] Blocks Placed: 1"));
    assert!(contains(&output, "[Alice] Distance Traveled: 5 blocks"));

    let output = run(&mut server, &["quit Nobody", "teleport Alice", "join alice"]).await;
    assert_eq!(
        output,
        vec![
            "! No player named Nobody is online",
            "! Unknown console command 'teleport'. Type 'help' for a list.",
            "! A player named alice is already online",
        ]
    );
}

#[tokio::test]
async fn test_stop_and_players() {
    let mut server = server().await;
    let output = run(&mut server, &["join Bob 1 2 3", "players"]).await;
    assert!(contains(&output, "Online players (1):"));
    assert!(contains(&output, "  Bob at (1.00, 2.00, 3.00)"));

    assert_eq!(server.handle_line("stop").await, Flow::Stop);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_script_mode_only_ticks_on_wait() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        script,
        "# a request that lapses\njoin Alice\njoin Bob\ncmd Alice tpa Bob\nwait 600\nstop\nwait 600"
    )
    .unwrap();

    let mut server = server().await;
    server.run_script(script.path()).await.unwrap();
    assert_eq!(server.host().current_tick(), 600);
    assert_eq!(server.events().get_stats().await.handler_failures, 0);
}
