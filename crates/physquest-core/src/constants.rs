//! Simulation constants and tuning parameters.

// --- Scoring ---

/// Points awarded per unit of quest difficulty.
pub const POINTS_PER_DIFFICULTY: u32 = 10;

// --- Quest 1/2: right triangles ---

/// Side length slider range for the hypotenuse quest.
pub const HYPOTENUSE_SIDE_MIN: f64 = 1.0;
pub const HYPOTENUSE_SIDE_MAX: f64 = 10.0;

/// Side length slider range for the angle quest.
pub const ANGLE_SIDE_MIN: f64 = 1.0;
pub const ANGLE_SIDE_MAX: f64 = 20.0;

/// Accepted error on an entered angle (degrees).
pub const ANGLE_TOLERANCE_DEG: f64 = 0.5;

// --- Quest 3: projectile ---

/// Gravity used by the projectile quest (m/s²).
pub const PROJECTILE_GRAVITY: f64 = 9.8;

/// Default launch speed (m/s).
pub const PROJECTILE_DEFAULT_SPEED: f64 = 50.0;

/// Launch speed slider range (m/s).
pub const PROJECTILE_SPEED_MIN: f64 = 10.0;
pub const PROJECTILE_SPEED_MAX: f64 = 100.0;

/// Range from which the target distance is drawn (meters).
pub const PROJECTILE_TARGET_MIN: f64 = 100.0;
pub const PROJECTILE_TARGET_MAX: f64 = 300.0;

/// Miss distance still counted as a hit (meters).
pub const PROJECTILE_HIT_TOLERANCE: f64 = 5.0;

/// Number of trajectory samples between launch and landing.
pub const PROJECTILE_SAMPLES: usize = 200;

/// Animation frame interval (seconds of wall time per revealed sample).
pub const PROJECTILE_FRAME_SECS: f64 = 0.02;

// --- Quest 4: water tank ---

/// Controller timestep (seconds).
pub const TANK_DT: f64 = 0.1;

/// Simulated duration (seconds).
pub const TANK_DURATION_SECS: f64 = 50.0;

/// Target water level (tank height is 1.0).
pub const TANK_TARGET_LEVEL: f64 = 0.5;

/// Tank cross-sectional area (m²).
pub const TANK_AREA: f64 = 1.0;

/// Constant inflow (m³/s).
pub const TANK_INFLOW: f64 = 0.1;

/// Maximum valve coefficient.
pub const TANK_KV_MAX: f64 = 0.5;

/// Integral term clamp (absolute).
pub const TANK_INTEGRAL_LIMIT: f64 = 10.0;

/// Number of trailing samples that must sit inside the band.
pub const TANK_SETTLE_SAMPLES: usize = 50;

/// Allowed deviation from target level in the settle window.
pub const TANK_LEVEL_TOLERANCE: f64 = 0.05;

/// Default gains.
pub const TANK_DEFAULT_KP: f64 = 1.0;
pub const TANK_DEFAULT_KI: f64 = 0.1;
pub const TANK_DEFAULT_KD: f64 = 0.1;

// --- Quest 5: mass-spring-damper ---

/// Integration timestep (seconds).
pub const SPRING_DT: f64 = 0.01;

/// Simulated duration (seconds).
pub const SPRING_DURATION_SECS: f64 = 10.0;

/// Position where the mass must come to rest (meters).
pub const SPRING_TARGET_POSITION: f64 = 10.0;

/// Residual speed below which the mass counts as stopped (m/s).
pub const SPRING_VELOCITY_THRESHOLD: f64 = 0.05;

/// Allowed distance from the target at the end of the run (meters).
pub const SPRING_POSITION_TOLERANCE: f64 = 0.1;

/// Default parameters.
pub const SPRING_DEFAULT_MASS: f64 = 1.0;
pub const SPRING_DEFAULT_STIFFNESS: f64 = 1.0;
pub const SPRING_DEFAULT_DAMPING: f64 = 0.1;
pub const SPRING_DEFAULT_X0: f64 = 0.0;

// --- Quest 6: inverted pendulum ---

/// Integration timestep (seconds).
pub const PENDULUM_DT: f64 = 0.02;

/// Simulated duration (seconds).
pub const PENDULUM_DURATION_SECS: f64 = 10.0;

/// Cart mass (kg).
pub const PENDULUM_CART_MASS: f64 = 1.0;

/// Pendulum mass (kg).
pub const PENDULUM_POLE_MASS: f64 = 0.1;

/// Distance from pivot to the pendulum's center of mass (meters).
pub const PENDULUM_LENGTH: f64 = 0.5;

/// Gravity used by the pendulum quest (m/s²).
pub const PENDULUM_GRAVITY: f64 = 9.81;

/// Initial angle from upright (radians).
pub const PENDULUM_INITIAL_ANGLE: f64 = 0.05;

/// Control force saturation (newtons).
pub const PENDULUM_FORCE_LIMIT: f64 = 100.0;

/// Angle band counted as upright (radians, ~2.86°).
pub const PENDULUM_UPRIGHT_TOLERANCE: f64 = 0.05;

/// Trailing window that must stay upright (seconds).
pub const PENDULUM_UPRIGHT_WINDOW_SECS: f64 = 2.0;

/// Angle beyond which the pendulum has fallen over (radians).
pub const PENDULUM_FALL_ANGLE: f64 = std::f64::consts::FRAC_PI_2;

/// Default gains.
pub const PENDULUM_DEFAULT_KP: f64 = 100.0;
pub const PENDULUM_DEFAULT_KI: f64 = 0.0;
pub const PENDULUM_DEFAULT_KD: f64 = 20.0;

// --- Quest 7: digit classifier ---

/// Flattened 8×8 image.
pub const DIGIT_INPUT_SIZE: usize = 64;

/// Side of the square digit image.
pub const DIGIT_SIDE: usize = 8;

/// Number of digit classes.
pub const DIGIT_CLASSES: usize = 10;

/// Maximum pixel intensity in the 8×8 digit images.
pub const DIGIT_MAX_INTENSITY: f64 = 16.0;

/// Fraction of the dataset held out for validation.
pub const DIGIT_VALIDATION_FRACTION: f64 = 0.2;

/// Seed used for the train/validation split.
pub const DIGIT_SPLIT_SEED: u64 = 42;

/// Synthetic samples generated per class (close to the classic 8×8 digits set).
pub const DIGIT_SAMPLES_PER_CLASS: usize = 180;

/// Standard deviation multiplier for initial weights.
pub const DIGIT_INIT_SCALE: f64 = 0.01;

/// Added inside the log of the cross-entropy loss.
pub const DIGIT_LOG_EPSILON: f64 = 1e-8;

/// Validation accuracy needed to pass (fraction).
pub const DIGIT_SUCCESS_ACCURACY: f64 = 0.90;

/// Default hyperparameters.
pub const DIGIT_DEFAULT_LEARNING_RATE: f64 = 0.01;
pub const DIGIT_DEFAULT_HIDDEN: usize = 64;
pub const DIGIT_DEFAULT_EPOCHS: usize = 10;

/// Wall-clock pause between training epochs when paced (seconds).
pub const DIGIT_EPOCH_FRAME_SECS: f64 = 0.1;
