//! Single-line idioms for route and function declarations
//!
//! Each framework or declaration style is one [`Idiom`] variant. A
//! [`Recognizer`] pairs a variant with its compiled pattern and turns a
//! trimmed source line into an [`IdiomMatch`]. Supporting another framework
//! means adding a variant, its pattern and its arm in `recognize`.
//!
//! ## Recognized forms
//!
//! ```text
//! app.get('/users/:id', getUser)          express   0.95
//! @app.route('/users', methods=['POST'])  flask     0.90
//! @GetMapping("/users/{id}")              spring    0.90
//! export async function loadUser(id) {    function  0.90
//! const loadUser = async (id) => {        binding   0.85
//! ```

use super::common::{Framework, HttpMethod};
use regex::Regex;

/// A declaration idiom the extractor knows how to recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idiom {
    /// `app.<verb>('<path>', handler)` / `router.<verb>(...)`
    ExpressRoute,
    /// `@app.route('<path>', methods=['<VERB>'])`
    FlaskRoute,
    /// `@<Verb>Mapping("<path>")`
    SpringMapping,
    /// `function name(`
    FunctionStatement,
    /// `const name = (...) =>` and `const name = function (`
    AnonymousBinding,
}

impl Idiom {
    pub const ENDPOINTS: [Idiom; 3] = [Idiom::ExpressRoute, Idiom::FlaskRoute, Idiom::SpringMapping];
    pub const FUNCTIONS: [Idiom; 2] = [Idiom::FunctionStatement, Idiom::AnonymousBinding];

    fn pattern(&self) -> &'static str {
        match self {
            Idiom::ExpressRoute => {
                r#"(?i)(?:app|router)\.(get|post|put|delete|patch|options|head|all)\s*\(\s*['"`]([^'"`]+)['"`]\s*,\s*([^)]+)\)"#
            }
            Idiom::FlaskRoute => {
                r#"(?i)@app\.route\s*\(\s*['"`]([^'"`]+)['"`](?:\s*,\s*methods\s*=\s*\[\s*['"`](\w+)['"`]\s*\])?\s*\)"#
            }
            Idiom::SpringMapping => {
                r#"(?i)@(get|post|put|delete|patch)Mapping\s*\(\s*['"`]([^'"`]+)['"`]\s*\)"#
            }
            Idiom::FunctionStatement => r"(?:export\s+)?(?:async\s+)?function\s+(\w+)\s*\(",
            Idiom::AnonymousBinding => {
                r"(?:export\s+)?(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?(?:(?:\([^)]*\)|\w+)\s*=>|function\s*\*?\s*\()"
            }
        }
    }

    /// Static confidence of a match; more explicit forms score higher
    pub fn confidence(&self) -> f64 {
        match self {
            Idiom::ExpressRoute => 0.95,
            Idiom::FlaskRoute => 0.9,
            Idiom::SpringMapping => 0.9,
            Idiom::FunctionStatement => 0.9,
            Idiom::AnonymousBinding => 0.85,
        }
    }
}

/// What a recognizer pulled out of a line
#[derive(Debug, Clone, PartialEq)]
pub enum IdiomMatch {
    Endpoint {
        method: HttpMethod,
        route: String,
        handler_name: Option<String>,
        framework: Framework,
    },
    Function {
        name: String,
    },
}

/// An idiom with its compiled pattern
#[derive(Debug, Clone)]
pub struct Recognizer {
    idiom: Idiom,
    pattern: Regex,
}

impl Recognizer {
    pub fn new(idiom: Idiom) -> Self {
        let pattern = Regex::new(idiom.pattern()).expect("idiom patterns are valid regexes");
        Self { idiom, pattern }
    }

    pub fn idiom(&self) -> Idiom {
        self.idiom
    }

    /// Recognize the idiom in a trimmed line
    pub fn recognize(&self, line: &str) -> Option<IdiomMatch> {
        let caps = self.pattern.captures(line)?;

        match self.idiom {
            Idiom::ExpressRoute => {
                let method = HttpMethod::parse(&caps[1])?;
                let handler_name = caps[3]
                    .trim()
                    .split(',')
                    .next()
                    .map(str::trim)
                    .filter(|h| is_handler_identifier(h))
                    .map(str::to_string);

                Some(IdiomMatch::Endpoint {
                    method,
                    route: caps[2].to_string(),
                    handler_name,
                    framework: Framework::Express,
                })
            }
            Idiom::FlaskRoute => {
                let method = match caps.get(2) {
                    Some(verb) => HttpMethod::parse(verb.as_str())?,
                    None => HttpMethod::Get,
                };

                Some(IdiomMatch::Endpoint {
                    method,
                    route: caps[1].to_string(),
                    handler_name: None,
                    framework: Framework::Flask,
                })
            }
            Idiom::SpringMapping => Some(IdiomMatch::Endpoint {
                method: HttpMethod::parse(&caps[1])?,
                route: caps[2].to_string(),
                handler_name: None,
                framework: Framework::Spring,
            }),
            Idiom::FunctionStatement | Idiom::AnonymousBinding => Some(IdiomMatch::Function {
                name: caps[1].to_string(),
            }),
        }
    }
}

/// `getUser` and `users.getUser` name a handler; `(req, res) => ...` does not
fn is_handler_identifier(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        })
}
