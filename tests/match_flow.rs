use oxo_session::model::ClientMessage;
use oxo_session::server::{ClientId, Connection, Matchmaker};
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_tungstenite::tungstenite::Message;

async fn connect(matchmaker: &Matchmaker) -> (ClientId, UnboundedReceiver<Message>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let client_id = ClientId::new_v4();
    matchmaker
        .register_connection(Connection::new(client_id, tx))
        .await;
    (client_id, rx)
}

/// Decode a raw frame the way the listener does before routing it.
async fn send_raw(matchmaker: &Matchmaker, client_id: ClientId, raw: &str) {
    let frame: ClientMessage = serde_json::from_str(raw).expect("frame should decode");
    matchmaker.handle_message(client_id, frame).await;
}

fn frames(rx: &mut UnboundedReceiver<Message>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(message) = rx.try_recv() {
        let Message::Text(text) = message else {
            panic!("expected a text frame");
        };
        frames.push(serde_json::from_str(text.as_str()).unwrap());
    }
    frames
}

#[tokio::test]
async fn two_clients_play_a_full_game() {
    let matchmaker = Matchmaker::new();
    let (alice, mut rx_alice) = connect(&matchmaker).await;
    let (bob, mut rx_bob) = connect(&matchmaker).await;

    send_raw(&matchmaker, alice, r#"{"type":"join"}"#).await;
    assert!(frames(&mut rx_alice).is_empty());

    send_raw(&matchmaker, bob, r#"{"type":"join"}"#).await;

    let start_alice = frames(&mut rx_alice);
    let start_bob = frames(&mut rx_bob);
    assert_eq!(start_alice[0]["type"], "start");
    assert_eq!(start_alice[0]["player"], "X");
    assert_eq!(start_bob[0]["player"], "O");
    assert_eq!(
        start_alice[0]["board"],
        json!(["", "", "", "", "", "", "", "", ""])
    );

    // Alice takes the top row; frames include the legacy echo fields a
    // browser client sends along with its moves.
    send_raw(&matchmaker, alice, r#"{"type":"move","index":0}"#).await;
    send_raw(&matchmaker, bob, r#"{"type":"move","index":4}"#).await;
    send_raw(
        &matchmaker,
        alice,
        r#"{"type":"move","index":1,"board":["X","","","","O","","","",""],"currentPlayer":"X"}"#,
    )
    .await;
    send_raw(&matchmaker, bob, r#"{"type":"move","index":3}"#).await;
    send_raw(&matchmaker, alice, r#"{"type":"move","index":2}"#).await;

    let to_alice = frames(&mut rx_alice);
    let to_bob = frames(&mut rx_bob);
    // Five move frames, the end frame, and the automatic reset.
    assert_eq!(to_alice.len(), 7);
    assert_eq!(to_alice.len(), to_bob.len());

    let end = &to_alice[5];
    assert_eq!(end["type"], "end");
    assert_eq!(end["board"], json!(["X", "X", "X", "O", "O", "", "", "", ""]));
    assert_eq!(end["gameOver"], json!(true));
    assert_eq!(end["winner"], "X");

    let reset = &to_alice[6];
    assert_eq!(reset["type"], "reset");
    assert_eq!(reset["board"], json!(["", "", "", "", "", "", "", "", ""]));
    assert_eq!(reset["currentPlayer"], "X");
    assert_eq!(reset["gameOver"], json!(false));
    assert_eq!(reset["winner"], Value::Null);

    // The pair keeps playing on the fresh board, Alice still first.
    send_raw(&matchmaker, alice, r#"{"type":"move","index":8}"#).await;
    assert_eq!(frames(&mut rx_bob)[0]["board"][8], "X");

    // An old client asks for a reset with its last known state attached;
    // the echo is ignored and the reset reaches both sides.
    send_raw(
        &matchmaker,
        bob,
        r#"{"type":"reset","board":["","","","","","","","","X"],"currentPlayer":"O","gameOver":false,"winner":null}"#,
    )
    .await;
    let after_reset = frames(&mut rx_alice);
    assert_eq!(after_reset.last().unwrap()["type"], "reset");
    assert_eq!(
        after_reset.last().unwrap()["board"],
        json!(["", "", "", "", "", "", "", "", ""])
    );
    assert_eq!(frames(&mut rx_bob)[0]["type"], "reset");
}

#[tokio::test]
async fn disconnect_mid_game_notifies_the_survivor_once() {
    let matchmaker = Matchmaker::new();
    let (alice, mut rx_alice) = connect(&matchmaker).await;
    let (bob, mut rx_bob) = connect(&matchmaker).await;
    send_raw(&matchmaker, alice, r#"{"type":"join"}"#).await;
    send_raw(&matchmaker, bob, r#"{"type":"join"}"#).await;
    send_raw(&matchmaker, alice, r#"{"type":"move","index":4}"#).await;
    frames(&mut rx_alice);
    frames(&mut rx_bob);

    matchmaker.unregister_connection(alice).await;

    let to_bob = frames(&mut rx_bob);
    assert_eq!(to_bob.len(), 1);
    assert_eq!(to_bob[0]["type"], "end");
    assert_eq!(to_bob[0]["winner"], "opponent disconnected");
    assert_eq!(to_bob[0]["gameOver"], json!(true));
    assert_eq!(to_bob[0]["board"], json!(["", "", "", "", "X", "", "", "", ""]));
    assert_eq!(to_bob[0]["currentPlayer"], "O");
    assert_eq!(matchmaker.session_count().await, 0);
    assert_eq!(matchmaker.connection_count().await, 1);

    // Bob is free to queue for a new opponent.
    send_raw(&matchmaker, bob, r#"{"type":"join"}"#).await;
    assert_eq!(matchmaker.waiting().await, Some(bob));

    let (carol, mut rx_carol) = connect(&matchmaker).await;
    send_raw(&matchmaker, carol, r#"{"type":"join"}"#).await;
    assert_eq!(frames(&mut rx_bob)[0]["player"], "X");
    assert_eq!(frames(&mut rx_carol)[0]["player"], "O");
}

#[tokio::test]
async fn relay_carries_opaque_payloads_between_the_pair() {
    let matchmaker = Matchmaker::new();
    let (alice, mut rx_alice) = connect(&matchmaker).await;
    let (bob, mut rx_bob) = connect(&matchmaker).await;
    send_raw(&matchmaker, alice, r#"{"type":"join"}"#).await;
    send_raw(&matchmaker, bob, r#"{"type":"join"}"#).await;
    frames(&mut rx_alice);
    frames(&mut rx_bob);

    send_raw(
        &matchmaker,
        alice,
        r#"{"type":"relay","payload":{"kind":"offer","sdp":"v=0\r\no=-"}}"#,
    )
    .await;

    let to_bob = frames(&mut rx_bob);
    assert_eq!(to_bob.len(), 1);
    assert_eq!(to_bob[0]["type"], "relay");
    assert_eq!(to_bob[0]["payload"]["kind"], "offer");
    assert!(frames(&mut rx_alice).is_empty());

    send_raw(&matchmaker, bob, r#"{"type":"relay","payload":{"kind":"answer"}}"#).await;
    assert_eq!(frames(&mut rx_alice)[0]["payload"]["kind"], "answer");
}
