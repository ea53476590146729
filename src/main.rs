use chess_arbiter::Game;
use chess_arbiter::terminal;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Chess Arbiter - terminal");

    let game = match std::env::args().nth(1) {
        Some(fen) => Game::from_fen(&fen).unwrap_or_else(|err| {
            log::warn!("ignoring start position {fen:?}: {err}");
            Game::new()
        }),
        None => Game::new(),
    };

    if let Err(err) = terminal::run_interactive_terminal(game) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
