use color_eyre::Result;
use log::info;
use snake_arbiter::{
    gridsnake::{
        models::{MoveResponse, ServerInfo},
        Snapshot,
    },
    proposers::{Greedy, Proposer},
};
use warp::{http::Method, Filter};

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const PORT: u16 = 7878;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    let cors = warp::cors()
        .allow_method(Method::GET)
        .allow_method(Method::POST)
        .allow_header("content-type")
        .allow_any_origin();

    let logging = warp::log(NAME);

    let info = warp::get().and(warp::path::end()).map(|| {
        warp::reply::json(&ServerInfo {
            name:    NAME.to_owned(),
            version: VERSION.to_owned(),
        })
    });

    let do_move = warp::post()
        .and(warp::path("move"))
        .and(warp::body::json())
        .map(|snap: Snapshot| {
            let movement = if snap.snake.is_empty() {
                snap.direction
            } else {
                Greedy.next_move(&snap).unwrap_or(snap.direction)
            };
            warp::reply::json(&MoveResponse { movement })
        });

    let api = info.or(do_move).with(cors).with(logging);

    info!("serving moves on port {PORT}");
    warp::serve(api).run(([0, 0, 0, 0], PORT)).await;

    Ok(())
}
