use std::path::PathBuf;

use tracing::info;

use hoops_terminal::config::{init_logging, load_dotenv, snapshot_path_from_env};
use hoops_terminal::dashboard::{coupon_text, quarter_text};
use hoops_terminal::snapshot;

fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_logging();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(snapshot_path_from_env);

    let snap = snapshot::load(&path)?;
    info!(games = snap.games.len(), path = %path.display(), "snapshot loaded");

    println!("Snapshot updated {}", snap.last_updated);
    for game in &snap.games {
        println!();
        println!("{} | {} | {}", game.api_date, game.label(), game.game_time);
        println!("{}", quarter_text(&game.visitor));
        println!("{}", quarter_text(&game.home));
        println!("{}", coupon_text(game));
    }
    Ok(())
}
