// src/noyau/rpn.rs
//
// Shunting-yard -> RPN
// Objectif:
// - Convertir une suite de Tok en RPN (postfix), sans aucune validation d’arité
//   (c’est l’évaluateur qui compte les opérandes)
//
// Règles:
// - précédences : to, = (1) < + - (2) < * / (3) < moins unaire (4) < ^ (5)
// - ^ associatif à droite : 2^3^2 = 2^(3^2)
// - Moins unaire:
//    - si '-' arrive quand on n’attend PAS une valeur => Tok::Neg (préfixe)
//    - '+' unaire ignoré
// - parenthèse fermante orpheline ou ouvrante restante => MismatchedParentheses

use super::erreur::ParseError;
use super::jetons::Tok;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::To | Tok::Op('=') => 1,
        Tok::Op('+') | Tok::Op('-') => 2,
        Tok::Op('*') | Tok::Op('/') => 3,
        Tok::Neg => 4,
        Tok::Op('^') => 5,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Op('^'))
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Num(2), Op(^), Num(3), Op(^), Num(2)]
///   rpn:    [Num(2), Num(3), Num(2), Op(^), Op(^)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, ParseError> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire.
    let mut prev_was_value = false;

    for tok in tokens.iter().cloned() {
        match tok {
            Tok::Num { .. } | Tok::Ident(_) => {
                out.push(tok);
                prev_was_value = true;
            }

            Tok::LPar => {
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::RPar => {
                // dépile jusqu’à '('
                loop {
                    match ops.pop() {
                        Some(Tok::LPar) => break,
                        Some(top) => out.push(top),
                        None => return Err(ParseError::MismatchedParentheses),
                    }
                }
                prev_was_value = true;
            }

            Tok::Op('-') if !prev_was_value => {
                // préfixe : rien à dépiler, il s’applique à ce qui suit
                ops.push(Tok::Neg);
            }

            Tok::Op('+') if !prev_was_value => {}

            _ => {
                // opérateur binaire (to, =, + - * / ^, ou inconnu)
                let p_tok = precedence(&tok);
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar) {
                        break;
                    }

                    let p_top = precedence(top);
                    let doit_pop = if is_right_associative(&tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(top) = ops.pop() {
                        out.push(top);
                    }
                }

                ops.push(tok);
                prev_was_value = false;
            }
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(ParseError::MismatchedParentheses);
        }
        out.push(op);
    }

    Ok(out)
}
