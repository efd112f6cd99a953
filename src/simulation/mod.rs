pub mod states;
pub mod shapes;
pub mod walls;
pub mod forces;
pub mod thrusters;
pub mod engine;
pub mod integrator;
pub mod clock;
pub mod scenario;
pub mod params;
pub mod app;
pub mod script;
