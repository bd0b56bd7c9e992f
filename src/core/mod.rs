// Core pipeline exports
pub mod messages;
pub mod outreach;
pub mod prompts;
pub mod search;
pub mod session;

pub use messages::{
    failure_message, generate_bulk, generate_sequentially, is_finished_message, ERROR_MESSAGE,
    FAILED_MESSAGE, PLACEHOLDER_MESSAGE,
};
pub use outreach::{OutreachOutcome, OutreachPipeline, OutreachPlan, OutreachProgress};
pub use search::{
    broaden_query, error_result, merge_results, schools_for, search_users_with_ai,
    search_with_fallback, FallbackOutcome,
};
pub use session::{
    is_logged_in, wait_for_login, DispatchReport, DispatchRun, LoginPolicy, OutreachDispatcher,
};
