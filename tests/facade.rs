//! End-to-end checks: a real listener, a snapshot on disk and the in-memory
//! cache store.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use courtside::Server;
use courtside::cache::{MemoryStore, ResponseCache};
use courtside::stats::{SnapshotSource, StatsService, Upstream};

const LAKERS: i64 = 1610612747;

fn info_row(id: i64, first: &str, last: &str) -> Value {
    let mut row = vec![Value::Null; 23];
    row[0] = json!(id);
    row[1] = json!(first);
    row[2] = json!(last);
    row[7] = json!("1984-12-30T00:00:00");
    row[11] = json!("6-9");
    row[12] = json!("250");
    row[13] = json!(21);
    row[14] = json!("23");
    row[15] = json!("Forward");
    row[18] = json!(LAKERS);
    row[19] = json!("Lakers");
    row[22] = json!("Los Angeles");
    Value::Array(row)
}

fn snapshot_file() -> tempfile::NamedTempFile {
    let snapshot = json!({
        "players": [
            {"id": 2544, "full_name": "LeBron James", "is_active": true},
            {"id": 1460, "full_name": "James Worthy", "is_active": false}
        ],
        "player_info": {
            "2544": [info_row(2544, "LeBron", "James")]
        }
    });
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), snapshot.to_string()).unwrap();
    file
}

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<Result<(), courtside::ServerError>>,
}

async fn start() -> Running {
    let file = snapshot_file();
    let source = SnapshotSource::load(file.path()).unwrap();
    let stats = StatsService::new(Upstream::new(Arc::new(source)));
    let cache = ResponseCache::new(Arc::new(MemoryStore::new()));
    let router = courtside::api::routes(&cache, stats, "it");

    let server = Server::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr();
    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(server.serve(router, async {
        let _ = stopped.await;
    }));
    Running { addr, stop, task }
}

async fn get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let raw = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn header<'a>(reply: &'a str, name: &str) -> Option<&'a str> {
    let (head, _) = reply.split_once("\r\n\r\n")?;
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

fn body(reply: &str) -> Value {
    let (_, body) = reply.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let running = start().await;

    let first = get(running.addr, "/players/2544").await;
    assert!(first.starts_with("HTTP/1.1 200 OK\r\n"), "{first}");
    assert_eq!(header(&first, "x-cache"), Some("miss"));

    let second = get(running.addr, "/players/2544").await;
    assert!(second.starts_with("HTTP/1.1 200 OK\r\n"), "{second}");
    assert_eq!(header(&second, "x-cache"), Some("hit"));
    assert_eq!(body(&first), body(&second));

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn unknown_player_is_404_with_detail() {
    let running = start().await;

    let reply = get(running.addr, "/players/1").await;
    assert!(reply.starts_with("HTTP/1.1 404 Not Found\r\n"), "{reply}");
    assert_eq!(body(&reply)["detail"], "Player with ID 1 not found");

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn bad_parameters_are_422() {
    let running = start().await;

    let reply = get(running.addr, "/players/lebron").await;
    assert!(reply.starts_with("HTTP/1.1 422 Unprocessable Entity\r\n"), "{reply}");

    let reply = get(running.addr, "/players/search").await;
    assert!(reply.starts_with("HTTP/1.1 422 Unprocessable Entity\r\n"), "{reply}");

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn search_skips_retired_players() {
    let running = start().await;

    let reply = get(running.addr, "/players/search?keyword=james").await;
    assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"), "{reply}");
    let players = body(&reply);
    let players = players.as_array().unwrap();
    assert_eq!(players.len(), 1);

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn unrouted_path_is_404() {
    let running = start().await;

    let reply = get(running.addr, "/nope").await;
    assert!(reply.starts_with("HTTP/1.1 404 Not Found\r\n"), "{reply}");
    assert_eq!(body(&reply)["detail"], "Not Found");

    running.stop.send(()).unwrap();
    running.task.await.unwrap().unwrap();
}
