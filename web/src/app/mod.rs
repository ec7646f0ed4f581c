use blitztoe_core::{Action, Cell, CellIndex, Game, GameConfig, GameStatus, PlayerCount, Symbol};
use gloo::timers::callback::Interval;
use web_time::{Duration, Instant};
use yew::prelude::*;

use players::PLAYERS;

mod avatars;
mod players;
mod setup;
mod utils;

#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    Start(PlayerCount),
    CellClick(CellIndex),
    ClockTick,
    AvatarsLoaded(Vec<Option<String>>),
    NewGame,
}

#[derive(Properties, Clone, PartialEq)]
pub struct GameProps {
    /// Per-player time budget override in seconds, from the URL hash.
    #[prop_or_default]
    pub budget: Option<u64>,
}

#[derive(Properties, Clone, PartialEq)]
struct PlayerCardProps {
    name: &'static str,
    rating: u16,
    symbol: char,
    avatar: String,
    clock: String,
    active: bool,
    expired: bool,
    right: bool,
}

#[function_component(PlayerCard)]
fn player_card(props: &PlayerCardProps) -> Html {
    let class = classes!(
        "player",
        props.active.then_some("active"),
        props.expired.then_some("expired"),
        props.right.then_some("right"),
    );
    html! {
        <div {class}>
            <img class="avatar" src={props.avatar.clone()} alt={props.name} />
            <span class="name">{props.name}</span>
            <span class="rating">{format!("rating {}", props.rating)}</span>
            <span class="symbol">{props.symbol.to_string()}</span>
            <span class="clock">{props.clock.clone()}</span>
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    index: CellIndex,
    cell: Cell,
    winner: bool,
    disabled: bool,
    on_click: Callback<CellIndex>,
}

#[function_component(BoardCell)]
fn board_cell(props: &CellProps) -> Html {
    let CellProps {
        index,
        cell,
        winner,
        disabled,
        on_click,
    } = props.clone();
    let class = classes!(
        "cell",
        winner.then_some("winner"),
        cell.is_empty().then_some("free"),
    );
    let onclick = Callback::from(move |_: MouseEvent| {
        if !disabled {
            log::debug!("cell {} clicked", index);
            on_click.emit(index);
        }
    });
    let symbol = cell
        .symbol()
        .map(|symbol| symbol.as_char().to_string())
        .unwrap_or_default();
    html! {
        <td {class} {onclick}>{symbol}</td>
    }
}

pub struct GameView {
    game: Option<Game>,
    avatars: Vec<Option<String>>,
    loading: bool,
    prev_clocks: Vec<u64>,
    _clock_interval: Option<Interval>,
}

impl GameView {
    fn create_clock(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(1000, move || link.send_message(Msg::ClockTick))
    }

    /// Whole-second clock readings for the active roster prefix, used to
    /// skip re-renders between visible changes.
    fn clock_secs(game: &Game, now: Instant) -> Vec<u64> {
        PLAYERS[..game.config().players as usize]
            .iter()
            .map(|meta| {
                game.remaining(meta.symbol, now)
                    .unwrap_or_default()
                    .as_secs()
            })
            .collect()
    }

    fn avatar_for(&self, index: usize) -> String {
        self.avatars
            .get(index)
            .and_then(|url| url.clone())
            .unwrap_or_else(|| PLAYERS[index].avatar.to_string())
    }

    fn player_name(symbol: Symbol) -> &'static str {
        PLAYERS[symbol.index()].name
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            game: None,
            avatars: Vec::new(),
            loading: false,
            prev_clocks: Vec::new(),
            _clock_interval: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Start(count) => {
                let budget = ctx
                    .props()
                    .budget
                    .map_or(GameConfig::DEFAULT_BUDGET, Duration::from_secs);
                let now = Instant::now();
                let game = Game::new(GameConfig::new(count, budget), now);
                log::info!("starting a {}-player game", game.config().players);

                self.prev_clocks = Self::clock_secs(&game, now);
                self.game = Some(game);
                self._clock_interval = Some(Self::create_clock(ctx));
                self.loading = true;
                self.avatars.clear();
                avatars::fetch(count as usize, ctx.link().callback(AvatarsLoaded));
                true
            }
            CellClick(index) => {
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                let updated = game.apply(Action::CellClick {
                    index,
                    now: Instant::now(),
                });
                if game.is_finished() {
                    log::debug!("game over: {:?}", game.status());
                    self._clock_interval = None;
                }
                updated
            }
            ClockTick => {
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                let now = Instant::now();
                let symbol = game.to_move();
                game.apply(Action::Tick { symbol, now });

                let clocks = Self::clock_secs(game, now);
                if self.prev_clocks != clocks {
                    self.prev_clocks = clocks;
                    true
                } else {
                    false
                }
            }
            AvatarsLoaded(urls) => {
                self.avatars = urls;
                self.loading = false;
                true
            }
            NewGame => {
                self._clock_interval = None;
                self.avatars.clear();
                self.loading = false;
                self.prev_clocks.clear();
                self.game.take().map_or(false, |_| true)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let Some(game) = self.game.as_ref() else {
            let on_start = ctx.link().callback(Start);
            return html! { <setup::PlayerCountForm {on_start} /> };
        };

        if self.loading {
            return html! { <div class="spinner">{"Looking up players…"}</div> };
        }

        let now = Instant::now();
        let config = game.config();
        let players = config.players as usize;
        let status = game.status();
        let to_move = game.to_move();
        let winning_line = game.winning_line();

        let move_info = match status {
            GameStatus::Won(symbol) => format!("{} wins the game", Self::player_name(symbol)),
            GameStatus::Drawn => "Draw — the board is full".to_string(),
            GameStatus::InProgress => format!(
                "Move {} · {} to play",
                game.move_count() + 1,
                Self::player_name(to_move)
            ),
        };

        let cards = PLAYERS[..players].iter().enumerate().map(|(i, meta)| {
            let remaining = game.remaining(meta.symbol, now).unwrap_or_default();
            let active = meta.symbol == to_move && !status.is_finished();
            html! {
                <PlayerCard
                    key={meta.id}
                    name={meta.name}
                    rating={meta.rating}
                    symbol={meta.symbol.as_char()}
                    avatar={self.avatar_for(i)}
                    clock={utils::format_clock(remaining)}
                    {active}
                    expired={game.is_out_of_time(meta.symbol, now)}
                    right={i % 2 == 1}
                />
            }
        });

        let on_click = ctx.link().callback(CellClick);
        let board = (0..3).map(|row| {
            let on_click = on_click.clone();
            html! {
                <tr>
                    {
                        for (0..3).map(|col| {
                            let index = row * 3 + col;
                            let cell = game.board().cell_at(index).unwrap_or_default();
                            let winner = winning_line.is_some_and(|line| line.contains(&index));
                            html! {
                                <BoardCell
                                    {index}
                                    {cell}
                                    {winner}
                                    disabled={status.is_finished()}
                                    on_click={on_click.clone()}
                                />
                            }
                        })
                    }
                </tr>
            }
        });

        let cb_new_game = ctx.link().callback(|_: MouseEvent| NewGame);
        let modal = status.is_finished().then(|| {
            let final_clocks = PLAYERS[..players].iter().map(|meta| {
                let remaining = game.remaining(meta.symbol, now).unwrap_or_default();
                html! {
                    <li key={meta.id}>
                        <span>{meta.name}</span>
                        <span>{utils::format_clock(remaining)}</span>
                    </li>
                }
            });
            let headline = match status.winner() {
                Some(symbol) => format!("{} wins!", Self::player_name(symbol)),
                None => "It's a draw".to_string(),
            };
            html! {
                <utils::Modal>
                    <div class="game-over">
                        <h2>{headline}</h2>
                        <ul>{ for final_clocks }</ul>
                        <button onclick={cb_new_game.clone()}>{"New game"}</button>
                    </div>
                </utils::Modal>
            }
        });

        html! {
            <div class="blitztoe">
                <header>
                    <h1>{"Blitz tic-tac-toe"}</h1>
                    <p class="game-info">
                        {format!(
                            "{} players · {} per clock",
                            players,
                            utils::format_clock(config.initial_budget)
                        )}
                    </p>
                </header>
                <section class="players">{ for cards }</section>
                <p class="move-info">{move_info}</p>
                <table class="board">{ for board }</table>
                { for modal }
            </div>
        }
    }
}
