//! jsonfold: json formatter that validates as you type and folds the result into a tree
//!
//! ```ignore
//! use jsonfold::{validate, Validation};
//!
//! match validate(r#"{"name": "Alice", "age": 30}"#) {
//!     Validation::Valid(formatted) => println!("{}", formatted.text),
//!     Validation::Invalid(e) => eprintln!("{}", e),
//!     Validation::Empty => {}
//! }
//! ```

pub mod debounce;
pub mod locale;
pub mod sample;
pub mod session;
pub mod tree;
pub mod validator;
pub mod value;
pub mod view;
pub mod watch;

pub use debounce::{Clock, Debouncer, ManualClock, SystemClock, DEFAULT_QUIET};
pub use locale::{Lang, Locale, LocaleBundle, LocaleError};
pub use session::{Output, Session};
pub use tree::{CollapseState, KeyOrder, TreeLine, TreePath};
pub use validator::{validate, validate_json, Formatted, JsonError, Validation};
pub use value::JsonValue;
pub use view::Layout;
