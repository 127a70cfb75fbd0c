// Minesweeper for the terminal
// The board engine and session logic are terminal-free; xtm_ui is the only module that draws

pub mod xtm_app;     // Menu-driven application state
pub mod xtm_board;   // Board generation, flood fill, flags and win detection
pub mod xtm_color;   // Cell glyphs and terminal colors
pub mod xtm_game;    // Difficulty presets and configuration
pub mod xtm_input;   // Input line validation
pub mod xtm_log;     // File logger
pub mod xtm_scores;  // Score log, rankings and player stats
pub mod xtm_session; // One playthrough as a state machine
pub mod xtm_ui;      // Terminal rendering and key handling
