pub mod price_board;
pub mod search_flow;
