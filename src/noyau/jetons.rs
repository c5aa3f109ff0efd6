// src/noyau/jetons.rs

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    /// Littéral numérique tel qu’écrit, avec son unité attachée éventuelle.
    Num {
        litteral: String,
        unite: Option<String>,
    },

    /// Référence nue à une unité (vaut « 1 unité »).
    Ident(String),

    /// `+ - * / ^ =` et tout caractère non reconnu.
    Op(char),

    LPar,
    RPar,

    /// Conversion binaire `a to u`.
    To,

    /// Moins unaire (produit par le parseur, jamais par `tokenize`).
    Neg,
}

fn debut_ident(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn suite_ident(c: char) -> bool {
    debut_ident(c) || matches!(c, '/' | '%' | '.')
}

/// Lit une suite de caractères d’identifiant à partir de `i`.
/// `/` et `.` n’y restent que suivis d’une lettre (`m/s` oui, `m/2` non).
fn lire_ident(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && suite_ident(chars[i]) {
        if matches!(chars[i], '/' | '.') && !chars.get(i + 1).is_some_and(|&c| debut_ident(c)) {
            break;
        }
        i += 1;
    }
    i
}

/// Tokenize une chaîne en jetons. N’échoue jamais : l’inattendu devient `Op`.
/// Supporte:
/// - nombres `12`, `0.5`, `.5`, `6.02e23`, `1E-9` (un seul point)
/// - unité collée ou séparée par des blancs (`5m`, `5 m`, `60 km/h`, `5eV`)
/// - identifiants [lettre_][lettre_/%.]* ; `to` est un mot-clé
/// - opérateurs + - * / ^ et parenthèses
pub fn tokenize(s: &str) -> Vec<Tok> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '(' {
            out.push(Tok::LPar);
            i += 1;
            continue;
        }
        if c == ')' {
            out.push(Tok::RPar);
            i += 1;
            continue;
        }

        // Nombre
        let chiffre_apres_point = c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if c.is_ascii_digit() || chiffre_apres_point {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }

            // exposant seulement si un chiffre suit (sinon `5eV` = 5 électronvolts)
            if i < chars.len() && matches!(chars[i], 'e' | 'E') {
                let mut j = i + 1;
                if j < chars.len() && matches!(chars[j], '+' | '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let litteral: String = chars[start..i].iter().collect();

            // unité attachée : collée ou après des blancs, sauf le mot-clé `to`
            let mut j = i;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            let mut unite = None;
            if j < chars.len() && (debut_ident(chars[j]) || chars[j] == '%') {
                let fin = lire_ident(&chars, j + 1);
                let mot: String = chars[j..fin].iter().collect();
                if mot != "to" {
                    unite = Some(mot);
                    i = fin;
                }
            }

            out.push(Tok::Num { litteral, unite });
            continue;
        }

        // Identifiant / mot-clé
        if debut_ident(c) {
            let fin = lire_ident(&chars, i + 1);
            let mot: String = chars[i..fin].iter().collect();
            i = fin;
            if mot == "to" {
                out.push(Tok::To);
            } else {
                out.push(Tok::Ident(mot));
            }
            continue;
        }

        out.push(Tok::Op(c));
        i += 1;
    }

    out
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num {
                litteral,
                unite: Some(u),
            } => format!("{litteral}[{u}]"),
            Tok::Num { litteral, .. } => litteral.clone(),
            Tok::Ident(name) => name.clone(),
            Tok::Op(c) => c.to_string(),
            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::To => "to".to_string(),
            Tok::Neg => "neg".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
