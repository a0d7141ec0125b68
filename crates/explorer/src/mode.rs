//! Interaction modes: free exploration vs. time-sequenced day planning.
//!
//! The mode decides the system instructions, the prompt suffix, which
//! locations join the itinerary, the route style preset and whether popups
//! open on their own. Everything here is pure.

use std::fmt;

use crate::map::RouteStyle;
use crate::model::Location;

const MODE_TOKEN: &str = "{{DAY_PLANNER_MODE}}";

const PLANNER_PROMPT_SUFFIX: &str = " day trip";

const INSTRUCTIONS_TEMPLATE: &str = r#"## System Instructions for an Interactive Map Explorer

**Model Persona:** You are a knowledgeable, geographically-aware assistant that provides visual information through maps.
Your primary goal is to answer any location-related query comprehensively, using map-based visualizations.
You can process information about virtually any place, real or fictional, past, present, or future.

**Current setting:** DAY_PLANNER_MODE is {{DAY_PLANNER_MODE}}.

**Core Capabilities:**

1. **Geographic Knowledge:** You possess extensive knowledge of:
   * Global locations, landmarks, and attractions
   * Historical sites and their significance
   * Natural wonders and geography
   * Cultural points of interest
   * Travel routes and transportation options

2. **Two Operation Modes:**

   **A. General Explorer Mode** (when DAY_PLANNER_MODE is false):
   * Respond to any query by identifying relevant geographic locations
   * Show multiple points of interest related to the query
   * Provide rich descriptions for each location
   * Connect related locations with appropriate paths
   * Focus on information delivery rather than scheduling

   **B. Day Planner Mode** (when DAY_PLANNER_MODE is true):
   * Create detailed day itineraries with:
     * A logical sequence of locations to visit throughout a day (typically 4-6 major stops)
     * Specific times and realistic durations for each location visit
     * Travel routes between locations with appropriate transportation methods
     * A balanced schedule considering travel time, meal breaks, and visit durations
     * Each location must include a 'time' (e.g., "09:00") and 'duration' property
     * Each location must include a 'sequence' number (1, 2, 3, etc.) to indicate order
     * Each line connecting locations should include 'transport' and 'travelTime' properties

**Output Format:**

1. **General Explorer Mode:**
   * Use the "location" function for each relevant point of interest with name, description, lat, lng
   * Use the "line" function to connect related locations if appropriate
   * Provide as many interesting locations as possible (4-8 is ideal)
   * Ensure each location has a meaningful description

2. **Day Planner Mode:**
   * Use the "location" function for each stop with required time, duration, and sequence properties
   * Use the "line" function to connect stops with transport and travelTime properties
   * Structure the day in a logical sequence with realistic timing
   * Include specific details about what to do at each location

**Important Guidelines:**
* For ANY query, always provide geographic data through the location function
* If unsure about a specific location, use your best judgment to provide coordinates
* Never reply with just questions or requests for clarification
* Always attempt to map the information visually, even for complex or abstract queries
* For day plans, create realistic schedules that start no earlier than 8:00am and end by 9:00pm

Remember: In explorer mode, respond to ANY query by finding relevant locations to display on the map, even if not explicitly about travel or geography. In day planner mode, create structured day itineraries."#;

/// How a query is interpreted and displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Unordered points of interest.
    #[default]
    Explorer,
    /// A time-sequenced day itinerary.
    Planner,
}

impl Mode {
    pub fn from_planner_flag(is_planner: bool) -> Self {
        if is_planner {
            Mode::Planner
        } else {
            Mode::Explorer
        }
    }

    pub fn is_planner(self) -> bool {
        self == Mode::Planner
    }

    /// System instructions for this mode.
    pub fn instructions(self) -> String {
        INSTRUCTIONS_TEMPLATE.replace(MODE_TOKEN, if self.is_planner() { "true" } else { "false" })
    }

    /// The user prompt as sent to the model.
    pub fn prompt_for(self, prompt: &str) -> String {
        match self {
            Mode::Explorer => prompt.to_string(),
            Mode::Planner => format!("{prompt}{PLANNER_PROMPT_SUFFIX}"),
        }
    }

    /// Fields a location must carry to count as an itinerary stop.
    ///
    /// Missing them is never an error; the location is still pinned.
    pub fn itinerary_fields(self) -> &'static [&'static str] {
        match self {
            Mode::Explorer => &[],
            Mode::Planner => &["time"],
        }
    }

    /// Whether `location` belongs in the day plan. Always false outside
    /// planner mode.
    pub fn is_itinerary_stop(self, location: &Location) -> bool {
        match self {
            Mode::Explorer => false,
            Mode::Planner => location.time.is_some(),
        }
    }

    pub fn route_style(self) -> RouteStyle {
        match self {
            Mode::Explorer => RouteStyle::Explorer,
            Mode::Planner => RouteStyle::Planner,
        }
    }

    /// Planner mode keeps the map uncluttered; stop details live in the
    /// itinerary list instead.
    pub fn auto_open_popups(self) -> bool {
        !self.is_planner()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Explorer => "explorer",
            Mode::Planner => "planner",
        })
    }
}

/// Free-function form of [`Mode::instructions`] keyed by the planner flag.
pub fn instructions_for(is_planner: bool) -> String {
    Mode::from_planner_flag(is_planner).instructions()
}

/// Free-function form of [`Mode::itinerary_fields`] keyed by the planner flag.
pub fn required_fields_for(is_planner: bool) -> &'static [&'static str] {
    Mode::from_planner_flag(is_planner).itinerary_fields()
}
