pub mod anamneses;
pub mod audiograms;
pub mod health;
pub mod ldl;
pub mod patients;
pub mod speech;
