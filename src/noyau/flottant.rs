// src/noyau/flottant.rs
//
// Flottants multiprécision : rug::Float (MPFR)
// --------------------------------------------
// Ici seulement les ponts avec le noyau exact :
// - BigInt <-> rug::Integer (chiffres u32, poids faible d’abord)
// - BigRational -> Float (un seul arrondi)
// - littéral décimal validé puis lu par rug (`1e2000000` ne construit aucun 10^e)
// - estimations f64 (log10, valeur approchée) pour les décisions rapides

use std::cmp::Ordering;
use std::f64::consts::LOG10_2;

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::ToPrimitive;
use rug::integer::Order;
use rug::{Float, Integer, Rational};

/* ------------------------ Entiers ------------------------ */

pub fn vers_integer(n: &BigInt) -> Integer {
    let (signe, chiffres) = n.to_u32_digits();
    let m = Integer::from_digits(&chiffres, Order::Lsf);
    if signe == Sign::Minus {
        -m
    } else {
        m
    }
}

pub fn depuis_integer(i: &Integer) -> BigInt {
    let m = BigInt::from(BigUint::new(i.to_digits::<u32>(Order::Lsf)));
    if i.cmp0() == Ordering::Less {
        -m
    } else {
        m
    }
}

/* ------------------------ Construction ------------------------ */

/// Conversion sans perte : la précision est élargie à la taille de `n`.
pub fn depuis_entier(n: &BigInt, precision: u32) -> Float {
    let bits = u32::try_from(n.bits()).unwrap_or(u32::MAX);
    Float::with_val(precision.max(bits), vers_integer(n))
}

pub fn depuis_rationnel(r: &BigRational, precision: u32) -> Float {
    let q = Rational::from((vers_integer(r.numer()), vers_integer(r.denom())));
    Float::with_val(precision, &q)
}

/// Forme canonique `<ent>.<frac>e<exp>` d’un littéral (`12`, `0.5`, `.5`, `6.02e23`, `1E-9`).
fn litteral_canonique(texte: &str) -> Option<String> {
    let (corps, exp) = match texte.find(['e', 'E']) {
        Some(i) => (&texte[..i], texte[i + 1..].parse::<i64>().ok()?),
        None => (texte, 0),
    };

    let (ent, frac) = corps.split_once('.').unwrap_or((corps, ""));
    if ent.is_empty() && frac.is_empty() {
        return None;
    }
    let chiffres_ok = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !chiffres_ok(ent) || !chiffres_ok(frac) {
        return None;
    }

    let ent = if ent.is_empty() { "0" } else { ent };
    let frac = if frac.is_empty() { "0" } else { frac };
    Some(format!("{ent}.{frac}e{exp}"))
}

/// None si le texte n’est pas un littéral, ou si sa valeur sort de la plage de MPFR.
pub fn depuis_decimal(texte: &str, precision: u32) -> Option<Float> {
    let canonique = litteral_canonique(texte)?;
    let lu = Float::parse(&canonique).ok()?;
    let f = Float::with_val(precision, lu);
    f.is_finite().then_some(f)
}

/* ------------------------ Prédicats / conversions ------------------------ */

pub fn est_negatif(f: &Float) -> bool {
    f.cmp0() == Some(Ordering::Less)
}

/// Entier porté par `f`, seulement s’il est de valeur entière.
pub fn vers_entier(f: &Float) -> Option<BigInt> {
    if !f.is_integer() {
        return None;
    }
    f.to_integer().map(|i| depuis_integer(&i))
}

/// Entier le plus proche ; 0 pour une valeur non finie.
pub fn arrondi_entier(f: &Float) -> BigInt {
    f.to_integer()
        .map(|i| depuis_integer(&i))
        .unwrap_or_default()
}

/// log10(|x|) ; -inf pour 0. Passe par (mantisse, exposant binaire) : jamais de débordement.
pub fn log10_abs(f: &Float) -> f64 {
    if f.is_zero() {
        return f64::NEG_INFINITY;
    }
    if !f.is_finite() {
        return f64::INFINITY;
    }
    let (m, e) = f.to_f64_exp();
    m.abs().log10() + f64::from(e) * LOG10_2
}

/// log10 d’un grand entier naturel, à partir des 64 bits de poids fort.
pub fn log10_biguint(m: &BigUint) -> f64 {
    let bits = m.bits();
    if bits <= 64 {
        return m.to_f64().map_or(f64::NEG_INFINITY, f64::log10);
    }
    let haut = (m >> (bits - 64)).to_f64().unwrap_or(1.0);
    haut.log10() + (bits - 64) as f64 * LOG10_2
}
