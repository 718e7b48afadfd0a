//! Deterministic response templates per intent
//!
//! Answers are generated from a fixed template table; live data sources
//! (mandi prices, weather feeds) sit behind other services and are out of
//! scope here.

use krishi_voice_core::EntitySet;

/// Render the answer for a recognized intent, substituting extracted
/// entities where the template uses them. Unknown intents get the generic
/// help message enumerating supported topics.
pub fn generate_response(intent: &str, entities: &EntitySet) -> String {
    match intent {
        "weather_query" => {
            "The weather forecast for your area shows clear skies with temperatures \
             between 25-35°C. No rainfall is expected in the next 7 days."
                .to_string()
        }
        "price_query" => {
            let subject = entities
                .crops
                .first()
                .map(String::as_str)
                .unwrap_or("agricultural commodities");
            format!(
                "Current market prices for {subject} are available. \
                 Please check the mandi prices section for details."
            )
        }
        "scheme_query" => {
            "There are several government schemes available for farmers. \
             You can view them in the schemes section of the app."
                .to_string()
        }
        "crop_query" => {
            let subject = entities
                .crops
                .first()
                .map(String::as_str)
                .unwrap_or("agricultural");
            format!(
                "For {subject} cultivation, recommended practices include proper \
                 sowing time, adequate irrigation, and timely fertilizer application."
            )
        }
        "disease_query" => {
            "For crop disease diagnosis, please upload a clear image of the \
             affected plant part in the disease detection section."
                .to_string()
        }
        "fertilizer_query" => {
            "Fertilizer recommendations depend on soil test results and crop \
             requirements. Please check the fertilizer recommendation section."
                .to_string()
        }
        _ => {
            "I can help you with weather forecasts, mandi prices, government \
             schemes, crop recommendations, and disease detection. \
             What would you like to know about?"
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_template_substitutes_first_crop() {
        let entities = EntitySet {
            crops: vec!["wheat".to_string(), "rice".to_string()],
            ..Default::default()
        };
        let response = generate_response("price_query", &entities);
        assert!(response.contains("prices for wheat"));
    }

    #[test]
    fn price_template_without_crop() {
        let response = generate_response("price_query", &EntitySet::default());
        assert!(response.contains("agricultural commodities"));
    }

    #[test]
    fn crop_template_substitutes() {
        let entities = EntitySet {
            crops: vec!["cotton".to_string()],
            ..Default::default()
        };
        let response = generate_response("crop_query", &entities);
        assert!(response.contains("For cotton cultivation"));
    }

    #[test]
    fn unknown_intent_gets_help_message() {
        let response = generate_response("general_query", &EntitySet::default());
        assert!(response.contains("weather forecasts"));
        assert!(response.contains("mandi prices"));
    }

    #[test]
    fn templates_are_deterministic() {
        let entities = EntitySet::default();
        assert_eq!(
            generate_response("weather_query", &entities),
            generate_response("weather_query", &entities)
        );
    }
}
