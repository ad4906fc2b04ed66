#![allow(non_upper_case_globals)]

//! Physical constants and a small unit system that expresses them in
//! user-chosen natural units.
//!
//! Concrete physical constants are taken from NIST.
//!
//! A [`UnitHandler`] is built from seven base-unit strings, one for each
//! [`Quantity`] and given in a fixed order:
//! ```
//! use tbspace::units::{ ConstantSource, UnitHandler };
//!
//! let uu = UnitHandler::from_strs(
//!     ["1 rad", "1 C", "1 pcs", "1 eV", "1 nm", "1 K", "1 fs"]).unwrap();
//! let hbar = uu.constant_in_natural_units("hbar").unwrap();
//! // ħ ≈ 0.6582 eV fs
//! assert!((hbar - 0.658211957).abs() < 1e-6);
//! ```

use std::f64::consts::PI;
use crate::error::UnitError;

pub type UResult<T> = Result<T, UnitError>;

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// speed of light in vacuum (m s^-1)
pub const c: f64 = 2.99792458e8;
//             +/- 0 (exact)

/// Avogadro's number
pub const NA: f64 = 6.02214076e23;
//              +/- 0 (exact)

/// Boltzmann's constant (J K^-1)
pub const kB: f64 = 1.380649e-23;
//              +/- 0 (exact)

/// electric permittivity in vacuum (F m^-1)
pub const e0: f64 = 8.8541878128e-12;
//              +/- 0.0000000013e-12

/// magnetic permeability in vacuum (N A^-2)
pub const u0: f64 = 1.25663706212e-6;
//              +/- 0.00000000019e-6

/// elementary charge (C)
pub const e: f64 = 1.602176634e-19;
//             +/- 0 (exact)

/// electron mass (kg)
pub const me: f64 = 9.1093837015e-31;
//              +/- 0.0000000028e-31

/// proton mass (kg)
pub const mp: f64 = 1.67262192369e-27;
//              +/- 0.00000000051e-27

/// Bohr radius (m)
pub const a0: f64 = 5.29177210903e-11;
//              +/- 0.00000000080e-11

/// Bohr magneton (J T^-1)
pub const uB: f64 = 9.2740100783e-24;
//              +/- 0.0000000028e-24

/// Base-unit strings selecting plain SI units, in [`Quantity::ALL`] order.
pub const SI_SCALES: [&str; 7]
    = ["1 rad", "1 C", "1 pcs", "1 J", "1 m", "1 K", "1 s"];

/// The seven base quantities of the unit system.
///
/// Mass is derived (J s² m⁻²) rather than being a base quantity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    Angle,
    Charge,
    Count,
    Energy,
    Length,
    Temperature,
    Time,
}

impl Quantity {
    /// All base quantities, in the order expected by
    /// [`UnitHandler::from_strs`].
    pub const ALL: [Self; 7] = [
        Self::Angle,
        Self::Charge,
        Self::Count,
        Self::Energy,
        Self::Length,
        Self::Temperature,
        Self::Time,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Angle => "angle",
            Self::Charge => "charge",
            Self::Count => "count",
            Self::Energy => "energy",
            Self::Length => "length",
            Self::Temperature => "temperature",
            Self::Time => "time",
        }
    }

    // (symbol, value in SI, accepts SI prefixes)
    fn units(self) -> &'static [(&'static str, f64, bool)] {
        match self {
            Self::Angle => &[("rad", 1.0, true), ("deg", PI / 180.0, false)],
            Self::Charge => &[("C", 1.0, true), ("e", e, false)],
            Self::Count => &[("pcs", 1.0, false), ("mol", NA, false)],
            Self::Energy => &[("J", 1.0, true), ("eV", e, true)],
            Self::Length => &[("m", 1.0, true), ("Ao", 1e-10, false)],
            Self::Temperature => &[("K", 1.0, true)],
            Self::Time => &[("s", 1.0, true)],
        }
    }

    // value in SI of a (possibly prefixed) unit symbol of this quantity
    fn lookup(self, symbol: &str) -> Option<f64> {
        let units = self.units();
        if let Some((_, val, _)) = units.iter().find(|(s, ..)| *s == symbol) {
            return Some(*val);
        }
        PREFIXES.iter()
            .filter_map(|(p, mult)| {
                symbol.strip_prefix(*p).map(|rest| (rest, *mult))
            })
            .find_map(|(rest, mult)| {
                units.iter()
                    .find(|(s, _, prefixable)| *prefixable && *s == rest)
                    .map(|(_, val, _)| mult * val)
            })
    }
}

const PREFIXES: [(&str, f64); 12] = [
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("m", 1e-3),
    ("u", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
];

// exponents over Quantity::ALL
type Dims = [i32; 7];

// (name, value in SI, dimensions)
const CONSTANTS: [(&str, f64, Dims); 12] = [
    ("h",         h,    [0,  0, 0,  1,  0,  0,  1]),
    ("hbar",      hbar, [0,  0, 0,  1,  0,  0,  1]),
    ("c",         c,    [0,  0, 0,  0,  1,  0, -1]),
    ("N_A",       NA,   [0,  0, 1,  0,  0,  0,  0]),
    ("k_B",       kB,   [0,  0, 0,  1,  0, -1,  0]),
    ("epsilon_0", e0,   [0,  2, 0, -1, -1,  0,  0]),
    ("mu_0",      u0,   [0, -2, 0,  1, -1,  0,  2]),
    ("e",         e,    [0,  1, 0,  0,  0,  0,  0]),
    ("m_e",       me,   [0,  0, 0,  1, -2,  0,  2]),
    ("m_p",       mp,   [0,  0, 0,  1, -2,  0,  2]),
    ("a_0",       a0,   [0,  0, 0,  0,  1,  0,  0]),
    ("mu_B",      uB,   [0,  1, 0,  0,  2,  0, -1]),
];

/// Source of named physical constants expressed in natural units.
///
/// This is the only view of the unit system the numerical pipeline depends
/// on.
pub trait ConstantSource {
    /// Return the value of the constant `name` in natural units.
    fn constant_in_natural_units(&self, name: &str) -> UResult<f64>;
}

/// A set of base-unit scales.
///
/// Each scale is the SI value of one natural unit of the corresponding
/// [`Quantity`]; a constant with dimensions `∏ Qᵢ^pᵢ` is expressed in natural
/// units by dividing its SI value by `∏ scaleᵢ^pᵢ`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnitHandler {
    scales: [f64; 7],
}

impl Default for UnitHandler {
    fn default() -> Self { Self { scales: [1.0; 7] } }
}

impl UnitHandler {
    /// Parse seven base-unit strings of the form `"<scale> <unit>"`, given in
    /// [`Quantity::ALL`] order.
    ///
    /// Recognized units are `rad`, `deg` (angle); `C`, `e` (charge); `pcs`,
    /// `mol` (count); `J`, `eV` (energy); `m`, `Ao` (length); `K`
    /// (temperature); and `s` (time). `rad`, `C`, `J`, `eV`, `m`, `K`, and `s`
    /// additionally accept the SI prefixes `E P T G M k m u n p f a`.
    pub fn from_strs<S>(scales: [S; 7]) -> UResult<Self>
    where S: AsRef<str>
    {
        let mut parsed = [0.0; 7];
        for ((slot, quantity), s) in
            parsed.iter_mut().zip(Quantity::ALL).zip(scales.iter())
        {
            *slot = parse_scale(quantity, s.as_ref())?;
        }
        Ok(Self { scales: parsed })
    }

    /// Like [`Self::from_strs`], but accept a slice, requiring it to have
    /// exactly seven elements.
    pub fn from_slice<S>(scales: &[S]) -> UResult<Self>
    where S: AsRef<str>
    {
        let arr: [&str; 7]
            = scales.iter()
            .map(|s| s.as_ref())
            .collect::<Vec<&str>>()
            .try_into()
            .map_err(|v: Vec<&str>| UnitError::BadFormat(v.join(", ")))?;
        Self::from_strs(arr)
    }

    /// Get the SI value of one natural unit of `quantity`.
    pub fn scale(&self, quantity: Quantity) -> f64 {
        self.scales[quantity as usize]
    }

    /// Return the value of the constant `name` in SI units.
    pub fn constant_in_si(&self, name: &str) -> UResult<f64> {
        lookup_constant(name).map(|(val, _)| val)
    }

    /// Convert a quantity with the given dimensions (exponents over
    /// [`Quantity::ALL`]) from SI to natural units.
    pub fn to_natural(&self, x: f64, dims: [i32; 7]) -> f64 {
        x / self.unit_of(dims)
    }

    /// Convert a quantity with the given dimensions (exponents over
    /// [`Quantity::ALL`]) from natural units to SI.
    pub fn from_natural(&self, x: f64, dims: [i32; 7]) -> f64 {
        x * self.unit_of(dims)
    }

    fn unit_of(&self, dims: Dims) -> f64 {
        self.scales.iter().zip(dims)
            .map(|(s, p)| s.powi(p))
            .product()
    }
}

impl ConstantSource for UnitHandler {
    fn constant_in_natural_units(&self, name: &str) -> UResult<f64> {
        let (val, dims) = lookup_constant(name)?;
        Ok(self.to_natural(val, dims))
    }
}

fn lookup_constant(name: &str) -> UResult<(f64, Dims)> {
    CONSTANTS.iter()
        .find(|(n, ..)| *n == name)
        .map(|(_, val, dims)| (*val, *dims))
        .ok_or_else(|| UnitError::UnknownConstant(name.to_string()))
}

fn parse_scale(quantity: Quantity, s: &str) -> UResult<f64> {
    let mut parts = s.split_whitespace();
    let (Some(num), Some(symbol), None)
        = (parts.next(), parts.next(), parts.next())
    else {
        return Err(UnitError::BadFormat(s.to_string()));
    };
    let num: f64
        = num.parse()
        .map_err(|_| UnitError::BadFormat(s.to_string()))?;
    if !(num.is_finite() && num > 0.0) {
        return Err(UnitError::BadScale(s.to_string()));
    }
    if let Some(unit) = quantity.lookup(symbol) {
        Ok(num * unit)
    } else if Quantity::ALL.iter().any(|q| q.lookup(symbol).is_some()) {
        Err(UnitError::WrongQuantity {
            unit: symbol.to_string(),
            expected: quantity.name(),
        })
    } else {
        Err(UnitError::UnknownUnit(symbol.to_string()))
    }
}
