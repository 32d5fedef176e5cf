//! Location function classifiers.
//!
//! The code list packs a location's roles into a short string such as
//! `"1-3-----"` or `"--34----"`. Each recognised character switches on one
//! independent flag; unrecognised characters (`0`, `6`, `7`, `8`, `-`) are
//! ignored.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single role a location can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Function {
    /// Port, as defined in UN/ECE Recommendation 16 (`1`).
    Port,
    /// Rail terminal (`2`).
    RailTerminal,
    /// Road terminal (`3`).
    RoadTerminal,
    /// Airport (`4`).
    Airport,
    /// Postal exchange office (`5`).
    PostalExchangeOffice,
    /// Border crossing (`B`).
    BorderCrossing,
}

impl Function {
    /// Every function, in code order.
    pub const ALL: [Self; 6] = [
        Self::Port,
        Self::RailTerminal,
        Self::RoadTerminal,
        Self::Airport,
        Self::PostalExchangeOffice,
        Self::BorderCrossing,
    ];

    /// Character that marks this function in the packed code string.
    pub const fn code(self) -> char {
        match self {
            Self::Port => '1',
            Self::RailTerminal => '2',
            Self::RoadTerminal => '3',
            Self::Airport => '4',
            Self::PostalExchangeOffice => '5',
            Self::BorderCrossing => 'B',
        }
    }

    /// Name of the boolean column holding this flag.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Port => "is_port",
            Self::RailTerminal => "is_rail_terminal",
            Self::RoadTerminal => "is_road_terminal",
            Self::Airport => "is_airport",
            Self::PostalExchangeOffice => "is_postal_exchange_office",
            Self::BorderCrossing => "is_border_cross",
        }
    }
}

/// The six function flags of a location.
///
/// # Examples
/// ```
/// use unlocode_core::{Function, Functions};
///
/// let functions = Functions::from_code("12-4----");
/// assert!(functions.port && functions.rail_terminal && functions.airport);
/// assert!(!functions.contains(Function::RoadTerminal));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Functions {
    /// Location is a port.
    pub port: bool,
    /// Location is a rail terminal.
    pub rail_terminal: bool,
    /// Location is a road terminal.
    pub road_terminal: bool,
    /// Location is an airport.
    pub airport: bool,
    /// Location is a postal exchange office.
    pub postal_exchange_office: bool,
    /// Location is a border crossing.
    pub border_crossing: bool,
}

impl Functions {
    /// Decompose a packed function code by character membership.
    pub fn from_code(code: &str) -> Self {
        let has = |function: Function| code.contains(function.code());
        Self {
            port: has(Function::Port),
            rail_terminal: has(Function::RailTerminal),
            road_terminal: has(Function::RoadTerminal),
            airport: has(Function::Airport),
            postal_exchange_office: has(Function::PostalExchangeOffice),
            border_crossing: has(Function::BorderCrossing),
        }
    }

    /// Whether the flag for `function` is set.
    pub const fn contains(&self, function: Function) -> bool {
        match function {
            Function::Port => self.port,
            Function::RailTerminal => self.rail_terminal,
            Function::RoadTerminal => self.road_terminal,
            Function::Airport => self.airport,
            Function::PostalExchangeOffice => self.postal_exchange_office,
            Function::BorderCrossing => self.border_crossing,
        }
    }
}
