// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    parse_lines, Education, Experience, MessageResult, MessagesCollection, OutreachMessage,
    Profile, SavedMessage, SearchResponse, SendStatus, UiState, UserProfile, UserResult,
};
pub use requests::{
    GenerateMessagesRequest, OutreachRequest, QueryRequest, SearchRequest, SendMessagesRequest,
};
pub use responses::{
    AuthStatusResponse, ErrorResponse, GenerateMessagesResponse, GeneratedMessages,
    HealthResponse, OutreachResponse, QueryResponse, SampleData, SendFailure,
    SendMessagesResponse,
};
