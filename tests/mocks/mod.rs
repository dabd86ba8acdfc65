mod mock_preference_store;

pub use mock_preference_store::MockPreferenceStore;
