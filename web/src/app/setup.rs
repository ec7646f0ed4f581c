use blitztoe_core::{GameConfig, PlayerCount};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(in crate::app) struct SetupProps {
    pub on_start: Callback<PlayerCount>,
}

fn validate(raw: &str) -> Result<PlayerCount, &'static str> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Enter a number!");
    }
    match raw.parse() {
        Ok(count) if count >= GameConfig::MIN_PLAYERS && count <= GameConfig::MAX_PLAYERS => {
            Ok(count)
        }
        _ => Err("Enter a number from 2 to 4!"),
    }
}

/// Form shown before a game exists; a valid submit seeds the engine.
#[function_component(PlayerCountForm)]
pub(in crate::app) fn player_count_form(props: &SetupProps) -> Html {
    let raw = use_state(String::new);
    let error = use_state(|| None::<&'static str>);

    let oninput = {
        let raw = raw.clone();
        let error = error.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            error.set(validate(&value).err());
            raw.set(value);
        })
    };

    let onclick = {
        let raw = raw.clone();
        let error = error.clone();
        let on_start = props.on_start.clone();
        Callback::from(move |_: MouseEvent| match validate(&raw) {
            Ok(count) => on_start.emit(count),
            Err(message) => error.set(Some(message)),
        })
    };

    let invalid = error.is_some();
    html! {
        <div class="setup">
            <label for="players">{"How many players?"}</label>
            <input
                id="players"
                type="text"
                placeholder="Player count"
                class={classes!(invalid.then_some("invalid"))}
                value={(*raw).clone()}
                {oninput}
            />
            { for (*error).map(|message| html! { <div class="error">{message}</div> }) }
            <button disabled={invalid} {onclick}>{"Play"}</button>
        </div>
    }
}
