use crate::config::{RuntimeConfig, SubmitPolicy};
use crate::html;
use crate::login::{field, LoginResult, ACTION};
use std::collections::{HashMap, HashSet};

/// Class that marks the login form inside a popup.
pub const LOGIN_FORM_CLASS: &str = "elementor-login";

/// Class that marks the container error banners go into.
pub const MESSAGE_AREA_CLASS: &str = "elementor-message-area";

/// Shown when the server fails without saying why.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Handle for a form element. The shell hands these out; the interceptor
/// only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(pub u32);

/// Things that can happen in the page
#[derive(Debug)]
pub enum Event {
    /// A popup opened. `form` is the login form found inside it, if any.
    PopupShown {
        /// The popup's numeric ID
        popup_id: u32,

        /// The login form in the popup
        form: Option<FormId>,
    },

    /// The user submitted an intercepted form. The shell has already
    /// prevented the browser's own submission.
    Submitted {
        /// Which form
        form: FormId,

        /// The form's fields, in document order
        fields: Vec<(String, String)>,
    },

    /// A request we asked for came back. `Err` means it never produced a
    /// result we could read (network failure, non-2xx, bad JSON.)
    Resolved {
        /// Which form sent it
        form: FormId,

        /// What happened
        outcome: Result<LoginResult, String>,
    },
}

/// Things the shell has to do to the page. Side effects!
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    /// Listen for submits on this form (and prevent the default each time.)
    AttachSubmitListener(FormId),

    /// Send a login request.
    Post(Submission),

    /// Reload the current page.
    Reload,

    /// Replace whatever is in the form's message area with this banner,
    /// creating the area if needed.
    ShowError {
        /// Which form
        form: FormId,

        /// What to show
        banner: ErrorBanner,
    },

    /// Enable or disable the form's submit control.
    SetSubmitEnabled {
        /// Which form
        form: FormId,

        /// Whether it can be clicked
        enabled: bool,
    },

    /// Write to the developer console.
    ConsoleError(String),
}

/// A request ready to go over the wire.
#[derive(Debug, PartialEq, Eq)]
pub struct Submission {
    /// Which form it came from
    pub form: FormId,

    /// Where to post it
    pub url: String,

    /// The form's own fields followed by the action and security token
    pub fields: Vec<(String, String)>,
}

/// The "functional core" of popup login interception.
#[derive(Debug)]
pub struct Interceptor {
    /// Where to post and which popups to watch
    config: RuntimeConfig,

    /// Forms we already listen to. Popups can be shown many times over the
    /// same form, and we only ever want one listener.
    attached: HashSet<FormId>,

    /// How many requests each form has out
    in_flight: HashMap<FormId, usize>,
}

impl Interceptor {
    /// Create a new interceptor
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            attached: HashSet::new(),
            in_flight: HashMap::new(),
        }
    }

    /// The configuration we were built with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Handle an `Event`, updating state and producing some side effect(s)
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::PopupShown { popup_id, form } => {
                if !self.config.watches(popup_id) {
                    return vec![];
                }

                match form {
                    Some(form) if self.attached.insert(form) => {
                        vec![Effect::AttachSubmitListener(form)]
                    }
                    _ => vec![],
                }
            }

            Event::Submitted { form, fields } => {
                if !self.attached.contains(&form) {
                    return vec![];
                }

                let single_flight = self.config.submit_policy == SubmitPolicy::SingleFlight;
                let outstanding = self.in_flight.entry(form).or_default();

                if single_flight && *outstanding > 0 {
                    return vec![];
                }

                *outstanding += 1;

                let mut fields = fields;
                fields.push((field::ACTION.to_string(), ACTION.to_string()));
                fields.push((field::SECURITY.to_string(), self.config.nonce.clone()));

                let post = Effect::Post(Submission {
                    form,
                    url: self.config.ajax_url.clone(),
                    fields,
                });

                if single_flight {
                    vec![
                        Effect::SetSubmitEnabled {
                            form,
                            enabled: false,
                        },
                        post,
                    ]
                } else {
                    vec![post]
                }
            }

            Event::Resolved { form, outcome } => {
                if let Some(outstanding) = self.in_flight.get_mut(&form) {
                    *outstanding = outstanding.saturating_sub(1);
                    if *outstanding == 0 {
                        self.in_flight.remove(&form);
                    }
                }

                let mut effects = match outcome {
                    Ok(LoginResult::Success { .. }) => return vec![Effect::Reload],

                    Ok(LoginResult::Failure { message }) => vec![Effect::ShowError {
                        form,
                        banner: ErrorBanner::from_message(&message),
                    }],

                    Err(problem) => {
                        let mut effects = vec![Effect::ConsoleError(format!("Error: {problem}"))];

                        if let Some(message) = &self.config.transport_error_message {
                            effects.push(Effect::ShowError {
                                form,
                                banner: ErrorBanner::from_message(message),
                            });
                        }

                        effects
                    }
                };

                if self.config.submit_policy == SubmitPolicy::SingleFlight {
                    effects.push(Effect::SetSubmitEnabled {
                        form,
                        enabled: true,
                    });
                }

                effects
            }
        }
    }
}

/// An error message as it appears in the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    /// Plain text (already decoded, never markup)
    message: String,

    /// Whether we add our own bold "Error:" label in front
    labelled: bool,
}

impl ErrorBanner {
    /// Build a banner from a message the server sent. The message may carry
    /// entities or tags; only its text survives.
    pub fn from_message(message: &str) -> Self {
        let message = if message.is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            html::text_content(message)
        };

        let labelled = !message.to_lowercase().starts_with("error:");

        Self { message, labelled }
    }

    /// The text a user reads.
    pub fn text(&self) -> String {
        if self.labelled {
            format!("Error: {}", self.message)
        } else {
            self.message.clone()
        }
    }

    /// Markup for the message area. The message is escaped, so whatever the
    /// server sent is shown rather than run.
    pub fn to_html(&self) -> String {
        let message = html::escape(&self.message);

        let body = if self.labelled {
            format!("<strong>Error:</strong> {message}")
        } else {
            format!("<strong>{message}</strong>")
        };

        format!(r#"<div class="elementor-message elementor-message-danger">{body}</div>"#)
    }
}
