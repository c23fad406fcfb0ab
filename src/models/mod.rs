pub mod criteria;
pub mod listing;
pub mod requirements;

pub use criteria::{BookingDetails, BookingResult, BookingStatus, SearchCriteria, SearchFilters};
pub use listing::{
    Coordinates, CoworkingProximity, CoworkingSpace, EventLocation, Listing, ListingInsights,
    Proximity, SafetyEvaluation,
};
pub use requirements::{
    Budget, Constraint, ConstraintKind, Destination, TravelDates, TravelRequirements, Travelers,
    WorkspaceNeeds,
};
