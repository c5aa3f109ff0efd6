//! Noyau : calculatrice à unités, entiers exacts et flottants multiprécision
//!
//! Organisation interne :
//! - dimension.rs : vecteur de dimension SI (7 exposants)
//! - unites.rs    : registre des unités + résolution (composés, préfixes, suffixe)
//! - flottant.rs  : ponts BigInt / BigRational / littéraux <-> rug::Float (MPFR)
//! - lecture.rs   : rendus décimaux (%g, décimales fixes, approximation log10)
//! - valeur.rs    : entier exact OU flottant, + dimension
//! - jetons.rs    : tokenisation (unités attachées, mot-clé `to`)
//! - rpn.rs       : shunting-yard
//! - eval.rs      : pile d’évaluation + pipeline complet
//! - format.rs    : choix de l’unité d’affichage
//! - tour.rs      : tours d’exposants `a^(b^(c))`
//! - erreur.rs    : erreurs typées
//! - config.rs    : seuils et précision

pub mod config;
pub mod dimension;
pub mod erreur;
pub mod eval;
pub mod flottant;
pub mod format;
pub mod jetons;
pub mod lecture;
pub mod rpn;
pub mod tour;
pub mod unites;
pub mod valeur;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use config::EvalConfig;
pub use erreur::EvalError;
pub use eval::eval_expression;
pub use tour::formate_tour;
pub use unites::Registre;
