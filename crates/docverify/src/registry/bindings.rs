use ethers::contract::abigen;

abigen!(
    DocumentRegistry,
    r#"[
        function addDocumentHash(bytes32 hash, string fullName, string dob, string gender, string physicalAddress, string phone, string email, string aadhaar, string pan, string passport, string drivingLicense, string voterId) external
        function verifyDocument(bytes32 hash) external view returns (bool)
        function getStudentDetails(bytes32 hash) external view returns (string, string, string, string, string, string, string, string, string, string, string)
    ]"#
);
