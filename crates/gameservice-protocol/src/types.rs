//! Identity and catalogue types shared by every layer.

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Server-assigned player identifier.
///
/// Newtype over `u32` so an id cannot be confused with a message type or
/// an error code in handler signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// MessageType: the frame's type byte
// ---------------------------------------------------------------------------

/// Message types the service understands or emits.
///
/// The wire byte space is much larger; frames with any other type are
/// still framed and decoded, then dropped by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Disconnection = 4,
    News = 7,
    GetPlayerInfo = 18,
    PlayerInfo = 19,
    GsSuccess = 38,
    GsFail = 39,
    StillAlive = 58,
    Ping = 59,
    AddFriend = 75,
    DelFriend = 76,
    LoginWaitModule = 77,
    LoginFriends = 78,
    AddIgnoreFriend = 79,
    DelIgnoreFriend = 80,
    StatusChange = 81,
    IgnoreList = 84,
    FriendList = 89,
    JoinWaitModule = 93,
    Login = 102,
    LobbyMsg = 209,
    LobbyServerLogin = 210,
    SetGroupSzData = 211,
    KeyExchange = 219,
}

impl MessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        let ty = match value {
            4 => Self::Disconnection,
            7 => Self::News,
            18 => Self::GetPlayerInfo,
            19 => Self::PlayerInfo,
            38 => Self::GsSuccess,
            39 => Self::GsFail,
            58 => Self::StillAlive,
            59 => Self::Ping,
            75 => Self::AddFriend,
            76 => Self::DelFriend,
            77 => Self::LoginWaitModule,
            78 => Self::LoginFriends,
            79 => Self::AddIgnoreFriend,
            80 => Self::DelIgnoreFriend,
            81 => Self::StatusChange,
            84 => Self::IgnoreList,
            89 => Self::FriendList,
            93 => Self::JoinWaitModule,
            102 => Self::Login,
            209 => Self::LobbyMsg,
            210 => Self::LobbyServerLogin,
            211 => Self::SetGroupSzData,
            219 => Self::KeyExchange,
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Human-readable name of a raw type byte, for logs.
pub fn type_name(value: u8) -> String {
    match MessageType::from_u8(value) {
        Some(ty) => format!("{ty:?}"),
        None => format!("Unknown({value})"),
    }
}

// ---------------------------------------------------------------------------
// Targets: the 4-bit sender/receiver ids
// ---------------------------------------------------------------------------

/// Routing targets carried in the header's sender/receiver nibbles.
pub mod target {
    pub const ROUTER: u8 = 1;
    pub const SERVER: u8 = 2;
    pub const WAIT_MODULE: u8 = 3;
    pub const PLAYER: u8 = 4;
    pub const ARENA_PLAYER: u8 = 5;
    pub const BACKEND: u8 = 6;
    pub const LOBBY_PLAYER: u8 = 7;
    pub const UNKNOWN: u8 = 8;
    pub const GAME: u8 = 9;
    pub const ARENA: u8 = 10;
}

// ---------------------------------------------------------------------------
// RouterErrorCode
// ---------------------------------------------------------------------------

/// Error codes carried in a `GSFAIL` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RouterErrorCode {
    UnknownError = 0,
    NotRegistered = 1,
    PasswordNotCorrect = 2,
    NotDisconnected = 3,
    ArenaNotAvailable = 4,
    FriendsNotAvailable = 5,
    NameAlreadyUsed = 6,
    PlayerNotConnected = 7,
    PlayerNotRegistered = 8,
    PlayerConnected = 9,
    PlayerAlreadyRegistered = 10,
    ClientVersionTooOld = 11,
    DbInBackupMode = 12,
    DbProblem = 13,
    ClientIncompatible = 50,
}

impl RouterErrorCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for RouterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}
