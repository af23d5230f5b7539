pub mod box_plot;
pub mod histogram;
pub mod stat_card;
