mod mocks;
mod reference_data;
