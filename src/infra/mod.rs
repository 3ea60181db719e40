pub mod flightradar;
