// src/noyau/lecture.rs
//
// Lecture décimale des flottants
// ------------------------------
// - `%g` à n chiffres significatifs (zéros de queue retirés)
// - décimales fixes (conversion `to`) via un entier “scalé” ×10^digits
// - notation scientifique approchée à partir d’un seul log10 (débordement)
//
// Les chiffres significatifs viennent de MPFR (arrondi au plus proche) ;
// les décimales fixes passent par un entier exact round(x * 10^d).

use num_bigint::BigInt;
use num_traits::Signed;
use rug::ops::Pow;
use rug::{Float, Integer};

use super::flottant::depuis_integer;

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: u64) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits as u64);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/* ------------------------ Rendus ------------------------ */

/// Équivalent de `%.{n}g`.
pub fn en_significatifs(x: &Float, n: usize) -> String {
    if x.is_zero() {
        return "0".to_string();
    }
    if !x.is_finite() {
        return x.to_string();
    }

    let n = n.max(1);
    let (negatif, mut chiffres, exp) = x.to_sign_string_exp(10, Some(n));
    while chiffres.len() < n {
        chiffres.push('0');
    }
    // valeur = 0.chiffres * 10^exp
    let e10 = exp.map_or(0, |e| i64::from(e) - 1);
    let signe = if negatif { "-" } else { "" };

    let corps = if e10 < -4 || e10 >= n as i64 {
        let (tete, reste) = chiffres.split_at(1);
        let reste = reste.trim_end_matches('0');
        let mant = if reste.is_empty() {
            tete.to_string()
        } else {
            format!("{tete}.{reste}")
        };
        let s = if e10 < 0 { '-' } else { '+' };
        format!("{mant}e{s}{:02}", e10.unsigned_abs())
    } else if e10 >= 0 {
        let (ent, frac) = chiffres.split_at(e10 as usize + 1);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            ent.to_string()
        } else {
            format!("{ent}.{frac}")
        }
    } else {
        let zeros = "0".repeat((-e10 - 1) as usize);
        format!("0.{zeros}{}", chiffres.trim_end_matches('0'))
    };

    format!("{signe}{corps}")
}

/// `decimales` chiffres après la virgule, sans retrait des zéros.
pub fn en_fixe(x: &Float, decimales: usize) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    // x * 10^d exact : la précision couvre les deux facteurs
    let echelle = Integer::from(10).pow(decimales as u32);
    let p = x.prec() + echelle.significant_bits() + 1;
    let scalee = Float::with_val(p, x * &echelle);
    let entier = scalee.to_integer().unwrap_or_default();
    scaled_to_decimal(depuis_integer(&entier), decimales)
}

/// Notation scientifique approchée depuis log10(|x|) : `3.678978851E39995`.
pub fn approx_depuis_log10(log10: f64, negatif: bool) -> String {
    let signe = if negatif { "-" } else { "" };
    if log10.is_nan() || log10 == f64::NEG_INFINITY {
        return "0".to_string();
    }
    if log10 == f64::INFINITY {
        return format!("{signe}inf");
    }
    // mantisse vide de sens : on garde l’ordre de grandeur seul
    if log10.abs() >= 1e15 {
        return format!("{signe}10^({log10:e})");
    }

    let mut ip = log10.floor();
    let mut texte = format!("{:.9}", 10f64.powf(log10 - ip));
    if texte.starts_with("10") {
        ip += 1.0;
        texte = format!("{:.9}", 1.0);
    }
    format!("{signe}{texte}E{}", ip as i64)
}
