//! Grading prompts sent to the completion API.
//!
//! The system instruction is constant. The user prompt is rebuilt for every
//! request from the rule, the optional question and the answer; for a given
//! request it is always byte-for-byte identical.

use crate::request::GradingRequest;
use crate::verdict::{MAX_IMPROVEMENT_POINTS, MAX_POSITIVE_POINTS};

/// System instruction constraining the model to JSON-only output.
pub const SYSTEM_PROMPT: &str =
    "Tu es un assistant qui répond uniquement en JSON valide. Aucun texte hors JSON.";

/// Opening of the user prompt: the corrector persona.
const PERSONA: &str = "\
Tu es un correcteur professionnel de français (orthographe + grammaire + ponctuation + style).
Tu dois suivre STRICTEMENT la règle fournie par l'utilisateur (RULE).";

/// Output contract: exact JSON shape expected back.
const OUTPUT_FORMAT: &str = r#"IMPORTANT:
- Retourne UNIQUEMENT un objet JSON (sans texte avant ni après).
- Le JSON doit respecter EXACTEMENT ce format:
{
  "status": "Conforme" | "À améliorer" | "Non conforme",
  "points_positifs": ["..."],
  "points_a_ameliorer": ["..."],
  "suggestion": "..."
}"#;

/// Build the user prompt for a grading request.
pub fn build_grading_prompt(request: &GradingRequest) -> String {
    let context = request
        .question
        .as_deref()
        .map(|q| format!("Tâche: {q}"))
        .unwrap_or_default();

    format!(
        "{PERSONA}

RULE:
{rule}

CONTEXTE (optionnel):
{context}

TEXTE À ANALYSER:
{answer}

{OUTPUT_FORMAT}

RÈGLES POUR LES CHAMPS:
- \"status\":
  - \"Conforme\" si aucune faute majeure.
  - \"À améliorer\" si quelques fautes/corrections utiles.
  - \"Non conforme\" si beaucoup de fautes ou texte très difficile à comprendre.
- \"points_a_ameliorer\": liste courte (max {max_improvements}) qui indique OÙ est la faute avec un extrait + la correction.
- \"points_positifs\": 0 à {max_positives} éléments max (ex: clarté, vocabulaire, structure).
- \"suggestion\": contient le rapport complet formaté (Verdict + fautes + texte corrigé complet + astuces), propre et lisible.
",
        rule = request.rule,
        answer = request.answer,
        max_improvements = MAX_IMPROVEMENT_POINTS,
        max_positives = MAX_POSITIVE_POINTS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_rule_and_answer_verbatim() {
        let request = GradingRequest::new("Il a manger une pomme.", "Corrige la grammaire.");
        let prompt = build_grading_prompt(&request);

        assert!(prompt.contains("RULE:\nCorrige la grammaire.\n"));
        assert!(prompt.contains("TEXTE À ANALYSER:\nIl a manger une pomme.\n"));
    }

    #[test]
    fn test_prompt_includes_question_when_present() {
        let request = GradingRequest::new("a", "r").with_question("Décris ta maison");
        let prompt = build_grading_prompt(&request);
        assert!(prompt.contains("CONTEXTE (optionnel):\nTâche: Décris ta maison\n"));

        let without = build_grading_prompt(&GradingRequest::new("a", "r"));
        assert!(without.contains("CONTEXTE (optionnel):\n\n"));
        assert!(!without.contains("Tâche:"));
    }

    #[test]
    fn test_prompt_states_status_policy_and_caps() {
        let prompt = build_grading_prompt(&GradingRequest::new("a", "r"));

        assert!(prompt.contains("\"Conforme\" si aucune faute majeure."));
        assert!(prompt.contains("\"À améliorer\" si quelques fautes"));
        assert!(prompt.contains("\"Non conforme\" si beaucoup de fautes"));
        assert!(prompt.contains("(max 8)"));
        assert!(prompt.contains("0 à 4 éléments max"));
        assert!(prompt.contains("Retourne UNIQUEMENT un objet JSON"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = GradingRequest::new("texte", "règle").with_question("q");
        assert_eq!(build_grading_prompt(&request), build_grading_prompt(&request));
    }

    #[test]
    fn test_system_prompt_demands_json_only() {
        assert!(SYSTEM_PROMPT.contains("JSON valide"));
        assert!(SYSTEM_PROMPT.contains("Aucun texte hors JSON"));
    }
}
