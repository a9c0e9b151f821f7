pub mod comment;
pub mod instruction;
pub mod inventory;
pub mod manufacturer;
pub mod marketplace;
pub mod piece;
pub mod set;
pub mod user;
pub mod user_set;

pub use comment::{Comment, CreateComment, UpdateComment};
pub use instruction::{CreateInstruction, Instruction, UpdateInstruction};
pub use inventory::{CreateInventory, Inventory, UpdateInventory};
pub use manufacturer::{CreateManufacturer, Manufacturer, ManufacturerWithSets, UpdateManufacturer};
pub use marketplace::{CreateMarketplaceLink, MarketplaceLink, UpdateMarketplaceLink};
pub use piece::{CreatePiece, Piece, UpdatePiece};
pub use set::{CreateSet, Set, SetWithManufacturer, UpdateSet};
pub use user::{User, UserPublic};
pub use user_set::{AssignUserSet, UserSet, UserSetWithSet};
