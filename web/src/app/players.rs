use blitztoe_core::Symbol;

/// Static presentation data for one roster slot. The engine never sees any
/// of this; it only consumes the symbol prefix sized to the player count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerMeta {
    pub id: usize,
    pub symbol: Symbol,
    pub name: &'static str,
    pub rating: u16,
    /// Bundled avatar shown when the online lookup fails or is still pending.
    pub avatar: &'static str,
}

/// Fixed roster in move order; a match consumes the first `players` entries.
pub const PLAYERS: [PlayerMeta; 4] = [
    PlayerMeta {
        id: 1,
        symbol: Symbol::Cross,
        name: "Marta",
        rating: 1230,
        avatar: "avatars/cross.png",
    },
    PlayerMeta {
        id: 2,
        symbol: Symbol::Nought,
        name: "Ilya",
        rating: 850,
        avatar: "avatars/nought.png",
    },
    PlayerMeta {
        id: 3,
        symbol: Symbol::Triangle,
        name: "Ana",
        rating: 1400,
        avatar: "avatars/triangle.png",
    },
    PlayerMeta {
        id: 4,
        symbol: Symbol::Square,
        name: "Timur",
        rating: 760,
        avatar: "avatars/square.png",
    },
];
