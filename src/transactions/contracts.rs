//! ABI bindings for the NFT token and marketplace contracts.
//!
//! Generated with `sol!` so every call site gets typed calldata and
//! typed return values. The token follows ERC-721 with enumerable and
//! metadata extensions plus a royalty hook; the marketplace exposes
//! fixed-price listing management and royalty registration.

use alloy::sol;

sol! {
    /// ERC-721 token with mint, burn and per-token royalties.
    #[sol(rpc)]
    contract NftToken {
        function safeMint(address to, string uri, uint256 royaltyValue) public;
        function burn(uint256 tokenId) public;
        function transferFrom(address from, address to, uint256 tokenId) public;
        function setApprovalForAll(address operator, bool approved) public;
        function isApprovedForAll(address owner, address operator) public view returns (bool);
        function ownerOf(uint256 tokenId) public view returns (address);
        function royaltyPercentage(uint256 tokenId) public view returns (uint256);
        function balanceOf(address owner) public view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) public view returns (uint256);
        function tokenURI(uint256 tokenId) public view returns (string);
    }

    /// Fixed-price marketplace for the token above.
    #[sol(rpc)]
    contract Marketplace {
        function listItem(address nftAddress, uint256 tokenId, uint256 quantity, uint256 pricePerItem, uint256 startingTime) public;
        function updateListing(address nftAddress, uint256 tokenId, uint256 newPrice, uint256 startingTime) public;
        function cancelListing(address nftAddress, uint256 tokenId) public;
        function buyItem(address nftAddress, uint256 tokenId, address owner) public payable;
        function registerRoyalty(address nftAddress, uint256 tokenId, uint16 royalty) public;
    }
}
