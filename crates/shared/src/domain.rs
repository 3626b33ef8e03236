use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Declares a closed enum whose variants map one-to-one onto wire strings.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ParseError::new(stringify!($name), other)),
                }
            }
        }
    };
}

wire_enum!(
    /// Compiler release track the backend builds with.
    Channel {
        Stable => "stable",
        Beta => "beta",
        Nightly => "nightly",
    }
);

wire_enum!(
    /// Build profile.
    Mode {
        Debug => "debug",
        Release => "release",
    }
);

wire_enum!(
    CrateType {
        Bin => "bin",
        Lib => "lib",
        Dylib => "dylib",
        Rlib => "rlib",
        Staticlib => "staticlib",
        Cdylib => "cdylib",
        ProcMacro => "proc-macro",
    }
);

wire_enum!(
    /// Output format requested from the shared compile endpoint.
    CompileTarget {
        Assembly => "asm",
        LlvmIr => "llvm-ir",
        Mir => "mir",
    }
);

wire_enum!(
    AssemblyFlavor {
        Att => "att",
        Intel => "intel",
    }
);

wire_enum!(
    Page {
        Index => "index",
        Help => "help",
    }
);

wire_enum!(
    Editor {
        Simple => "simple",
        Advanced => "advanced",
    }
);

wire_enum!(
    Orientation {
        Automatic => "automatic",
        Horizontal => "horizontal",
        Vertical => "vertical",
    }
);

wire_enum!(
    /// Output pane currently shown to the user.
    Focus {
        Execute => "execute",
        Format => "format",
        Clippy => "clippy",
        Assembly => "asm",
        LlvmIr => "llvm-ir",
        Mir => "mir",
        Gist => "gist",
    }
);

impl Default for Channel {
    fn default() -> Self {
        Channel::Stable
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Debug
    }
}

impl Default for AssemblyFlavor {
    fn default() -> Self {
        AssemblyFlavor::Att
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Index
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::Advanced
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Automatic
    }
}

impl CompileTarget {
    /// Pane that shows this target's output.
    pub fn focus(self) -> Focus {
        match self {
            CompileTarget::Assembly => Focus::Assembly,
            CompileTarget::LlvmIr => Focus::LlvmIr,
            CompileTarget::Mir => Focus::Mir,
        }
    }
}

/// Unrecognized names yield `None` rather than an error; deep links carry
/// arbitrary user input.
pub fn parse_channel(value: &str) -> Option<Channel> {
    value.parse().ok()
}

pub fn parse_mode(value: &str) -> Option<Mode> {
    value.parse().ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
