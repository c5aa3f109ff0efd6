//! Tests scientifiques (campagne) : propriétés de référence + invariants + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//! - propriétés aléatoires (proptest) sur des cas peu nombreux mais variés
//!
//! Notes :
//! - `+`/`-` rendent toujours un flottant : l’exactitude des sommes entières se vérifie
//!   sur la valeur (`valeur_entiere`), pas sur le rendu à 12 chiffres.
//! - `to` écrit 12 décimales fixes : l’aller-retour tolère l’arrondi de ces décimales.

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use proptest::prelude::*;

use super::config::EvalConfig;
use super::erreur::{ArithmeticError, EvalError};
use super::eval::{eval_expression, Resultat};
use super::unites::Registre;
use super::valeur::Valeur;

fn eval(expr: &str) -> Result<Resultat, EvalError> {
    eval_expression(expr, &Registre::standard(), &EvalConfig::default()).map(|(r, _d)| r)
}

fn eval_ok(expr: &str) -> Resultat {
    eval(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_rendu(expr: &str, attendu: &str) {
    let r = eval_ok(expr);
    assert!(!r.approximatif, "expr={expr:?} approché: {}", r.texte);
    assert_eq!(r.texte.trim(), attendu.trim(), "expr={expr:?}");
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/// Nombre en tête d’un rendu `<nombre> <unité>`.
fn nombre_rendu(texte: &str) -> f64 {
    texte
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("rendu non numérique: {texte:?}"))
}

/* ------------------------ Propriétés de référence ------------------------ */

#[test]
fn sci_addition_avec_normalisation() {
    assert_rendu("5 m + 12 cm", "5.12 m");
}

#[test]
fn sci_conversion_exacte() {
    assert_rendu("100 km to m", "100000.000000000000 m");
}

#[test]
fn sci_dimensions_incompatibles() {
    assert_eq!(eval("5 m + 3 kg"), Err(EvalError::dimension_mismatch("+")));
}

#[test]
fn sci_division_par_zero() {
    assert_eq!(
        eval("5 / 0"),
        Err(EvalError::Arithmetic(ArithmeticError::DivisionByZero))
    );
}

#[test]
fn sci_puissance_entiere_exacte() {
    assert_rendu("7 ^ 20", &BigInt::from(7).pow(20).to_string());
}

#[test]
fn sci_debordement_sans_calcul_exact() {
    let t0 = Instant::now();
    let r = eval_ok("9999 ^ 9999");
    // l’estimation seule doit suffire : pas de BigInt de 40 000 chiffres
    budget(t0, Duration::from_millis(200));
    assert!(r.approximatif);
    assert!(r.texte.contains('E'), "{}", r.texte);
    assert!(r.texte.ends_with("E39995"), "{}", r.texte);
}

#[test]
fn sci_associativite_puissance() {
    assert_rendu("2 ^ 3 ^ 2", "512");
    assert_rendu("(2 ^ 3) ^ 2", "64");
}

/* ------------------------ Aller-retour d’unités ------------------------ */

const LONGUEURS: [&str; 8] = ["m", "cm", "mm", "km", "in", "ft", "yd", "mi"];
const MASSES: [&str; 4] = ["kg", "g", "lb", "oz"];
const DUREES: [&str; 5] = ["s", "min", "h", "day", "ms"];

fn paire_meme_dimension() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop_oneof![
        (prop::sample::select(LONGUEURS.to_vec()), prop::sample::select(LONGUEURS.to_vec())),
        (prop::sample::select(MASSES.to_vec()), prop::sample::select(MASSES.to_vec())),
        (prop::sample::select(DUREES.to_vec()), prop::sample::select(DUREES.to_vec())),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sci_aller_retour_conversion(
        ent in 1u32..1_000_000,
        frac in 0u32..1000,
        (u1, u2) in paire_meme_dimension(),
    ) {
        let reg = Registre::standard();
        let x: f64 = format!("{ent}.{frac:03}").parse().unwrap();

        let aller = eval_ok(&format!("{ent}.{frac:03} {u1} to {u2}"));
        let suffixe = format!(" {u2}");
        prop_assert!(aller.texte.ends_with(&suffixe), "rendu {:?}", aller.texte);
        let y = nombre_rendu(&aller.texte);

        let retour = eval_ok(&format!("{} {u2} to {u1}", aller.texte.split_whitespace().next().unwrap()));
        let x2 = nombre_rendu(&retour.texte);

        // erreur d’arrondi : 0.5e-12 en u2 (ramenée en u1) + 0.5e-12 en u1
        let f1 = reg.cherche(u1).unwrap().facteur_f64();
        let f2 = reg.cherche(u2).unwrap().facteur_f64();
        let tol = 1e-12 * (f2 / f1 + 1.0) + 1e-12 * x;
        prop_assert!((x2 - x).abs() <= tol, "x={x} y={y} x2={x2} ({u1} -> {u2})");
    }

    #[test]
    fn sci_idempotence_entiers(
        a in "[1-9][0-9]{20,80}",
        b in "[1-9][0-9]{20,80}",
    ) {
        let p = EvalConfig::default().precision;
        let va = Valeur::depuis_litteral(&a, None, p).unwrap();
        let vb = Valeur::depuis_litteral(&b, None, p).unwrap();
        let ia: BigInt = a.parse().unwrap();
        let ib: BigInt = b.parse().unwrap();

        let somme = va.additionne(&vb, p).unwrap();
        prop_assert_eq!(somme.valeur_entiere(), Some(&ia + &ib));
        let diff = va.soustrait(&vb, p).unwrap();
        prop_assert_eq!(diff.valeur_entiere(), Some(&ia - &ib));

        // le produit reste entier exact jusque dans le rendu
        let r = eval_ok(&format!("{a} * {b}"));
        prop_assert_eq!(r.texte, (&ia * &ib).to_string());
    }
}

/* ------------------------ Cohérence dimensionnelle ------------------------ */

#[test]
fn sci_derivees_coherentes() {
    // F = m a ; E = F d ; P = E / t
    assert_rendu("2 kg * 3 m / 1 s ^ 2", "6 N");
    assert_rendu("6 N * 2 m", "12 J");
    assert_rendu("12 J / 4 s", "3 W");
    assert_rendu("1 / 1 s", "1 Hz");
    assert_rendu("1 atm / 1 bar", "1.01325");
}

#[test]
fn sci_quotient_de_soi_sans_dimension() {
    assert_rendu("3 ft / 1 m", "0.9144");
    assert_rendu("1 mi / 1 km", "1.609344");
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut expr = String::new();
    for k in 0..200 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("5 mm");
        budget(t0, max);
    }

    // 200 * 5 mm = 1 m
    assert_rendu(&expr, "1 m");
    budget(t0, max);
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // gros entiers contrôlés (100 chiffres), produit exact
    let big = "9".repeat(100);
    let r = eval_ok(&format!("{big} * {big}"));
    budget(t0, max);
    assert_eq!(r.texte.len(), 200);
    assert!(r.texte.starts_with("99") && r.texte.ends_with("01"));

    // puissance exacte proche du plafond de chiffres
    let r = eval_ok("3 ^ 20000");
    budget(t0, max);
    assert!(!r.approximatif);
    assert_eq!(r.texte, BigInt::from(3).pow(20000).to_string());
}

#[test]
fn sci_stress_profondeur_parentheses() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut expr = "1 m".to_string();
    for _ in 0..300 {
        expr = format!("({expr})");
    }
    assert_rendu(&expr, "1 m");
    budget(t0, max);
}
