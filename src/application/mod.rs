//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Poll / Vote / Comment Repository）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - assembler: 记录与聚合的转换、响应视图
//! - error: 应用层错误定义

pub mod assembler;
pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use assembler::{CommentView, OptionView, PollResultsView, PollView, ResultEntryView};

pub use commands::{
    // Poll commands
    AddPollOption,
    CreatePoll,
    DeletePoll,
    NewOption,
    RecountPoll,
    SetPollActive,
    UpdatePoll,
    // Vote commands
    CastVote,
    // Comment commands
    DeleteComment,
    PostComment,
    ReactToComment,
    // Handlers
    handlers::{
        AddPollOptionHandler, CastVoteHandler, CreatePollHandler, DeleteCommentHandler,
        DeletePollHandler, PostCommentHandler, ReactToCommentHandler, RecountPollHandler,
        RecountResponse, SetPollActiveHandler, UpdatePollHandler, VoteReceipt,
    },
};

pub use error::ApplicationError;

pub use ports::{
    CommentRecord, CommentRepositoryPort, PollOptionRecord, PollRecord, PollRepositoryPort,
    RepositoryError, VoteRecord, VoteRepositoryPort,
};

pub use queries::{
    // Poll queries
    GetPoll,
    GetPollResults,
    ListPolls,
    // Vote queries
    GetVoteStatus,
    // Comment queries
    ListComments,
    // Handlers
    handlers::{
        GetPollHandler, GetPollResultsHandler, GetVoteStatusHandler, ListCommentsHandler,
        ListPollsHandler, VoteStatusResponse,
    },
};
