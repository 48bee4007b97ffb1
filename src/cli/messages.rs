//! User-facing text in each supported language.

use crate::application::{ExtractionError, PipelineError};
use crate::domain::runner::Locale;

/// Message catalogue for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn banner(&self) -> &'static str {
        match self.locale {
            Locale::Pl => "Przewidywany czas ukończenia półmaratonu wrocławskiego",
            Locale::En => "Wrocław half-marathon finishing time predictor",
        }
    }

    pub fn input_prompt(&self) -> &'static str {
        match self.locale {
            Locale::Pl => {
                "Proszę wpisz swoje dane: wiek, płeć oraz ile czasu zajmuje Ci pokonanie dystansu 5 km."
            }
            Locale::En => "Please enter your age, gender and how long it takes you to run 5 km.",
        }
    }

    pub fn commands_hint(&self) -> &'static str {
        match self.locale {
            Locale::Pl => "(:clear czyści dane, :quit kończy)",
            Locale::En => "(:clear resets your data, :quit exits)",
        }
    }

    pub fn api_key_prompt(&self) -> &'static str {
        match self.locale {
            Locale::Pl => "Klucz API OpenAI",
            Locale::En => "OpenAI API key",
        }
    }

    pub fn api_key_missing(&self) -> &'static str {
        match self.locale {
            Locale::Pl => "Dodaj swój klucz API OpenAI, aby móc korzystać z tej aplikacji.",
            Locale::En => "Add your OpenAI API key to use this application.",
        }
    }

    pub fn result_title(&self) -> &'static str {
        match self.locale {
            Locale::Pl => "Przewidywany czas ukończenia półmaratonu:",
            Locale::En => "Predicted half-marathon finishing time:",
        }
    }

    pub fn empty_input(&self) -> &'static str {
        match self.locale {
            Locale::Pl => "Proszę wpisz swoje dane.",
            Locale::En => "Please enter your details.",
        }
    }

    pub fn cleared(&self) -> &'static str {
        match self.locale {
            Locale::Pl => "Dane zostały wyczyszczone.",
            Locale::En => "Your data has been cleared.",
        }
    }

    pub fn model_unavailable(&self, error: &dyn std::fmt::Display) -> String {
        match self.locale {
            Locale::Pl => format!("Wystąpił błąd podczas ładowania modelu: {}", error),
            Locale::En => format!("Failed to load the prediction model: {}", error),
        }
    }

    /// Text shown when a submission produced no prediction.
    pub fn pipeline_error(&self, error: &PipelineError) -> String {
        match error {
            PipelineError::Incomplete { missing, .. } => missing.message(self.locale),
            PipelineError::Extraction(ExtractionError::Schema(_)) => match self.locale {
                Locale::Pl => {
                    "Nie udało się odczytać danych z tekstu. Spróbuj opisać je inaczej.".to_string()
                }
                Locale::En => {
                    "Could not read your details from the text. Try describing them differently."
                        .to_string()
                }
            },
            PipelineError::Extraction(ExtractionError::Provider(err)) => match self.locale {
                Locale::Pl => format!("Wystąpił błąd podczas komunikacji z modelem językowym: {}", err),
                Locale::En => format!("The language model request failed: {}", err),
            },
            PipelineError::Prediction(err) => match self.locale {
                Locale::Pl => format!("Wystąpił błąd podczas predykcji: {}", err),
                Locale::En => format!("Prediction failed: {}", err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::runner::{
        into_validated, ConvertedRecord, Gender, PredictionError, SchemaValidationError,
        UserRecord,
    };
    use crate::ports::AIError;

    fn incomplete(converted: ConvertedRecord) -> PipelineError {
        PipelineError::Incomplete {
            record: UserRecord::unresolved(),
            converted,
            missing: into_validated(converted).unwrap_err(),
        }
    }

    #[test]
    fn incomplete_lists_every_missing_field_in_polish() {
        let error = incomplete(ConvertedRecord {
            age: None,
            gender: None,
            time_5km_seconds: None,
        });

        assert_eq!(
            Messages::new(Locale::Pl).pipeline_error(&error),
            "Brakuje danych dla: wieku (przedział 10-99 lat), płci (K lub M), \
             czasu na 5 km (format HH:MM:SS, minimum 10 minut). Proszę uzupełnij dane."
        );
    }

    #[test]
    fn incomplete_in_english() {
        let error = incomplete(ConvertedRecord {
            age: None,
            gender: Some(Gender::Female),
            time_5km_seconds: Some(1500),
        });

        assert_eq!(
            Messages::new(Locale::En).pipeline_error(&error),
            "Incomplete data: missing age (10–99)."
        );
    }

    #[test]
    fn schema_failure_has_generic_message() {
        let error = PipelineError::Extraction(ExtractionError::Schema(
            SchemaValidationError::all_fields("bad"),
        ));
        let text = Messages::new(Locale::Pl).pipeline_error(&error);
        assert!(text.starts_with("Nie udało się odczytać danych"));
    }

    #[test]
    fn provider_and_prediction_failures_include_cause() {
        let provider = PipelineError::Extraction(ExtractionError::Provider(AIError::Timeout {
            timeout_secs: 30,
        }));
        assert!(Messages::new(Locale::En).pipeline_error(&provider).contains("30"));

        let prediction = PipelineError::Prediction(PredictionError::Negative(-5.0));
        assert!(Messages::new(Locale::Pl)
            .pipeline_error(&prediction)
            .starts_with("Wystąpił błąd podczas predykcji"));
    }
}
